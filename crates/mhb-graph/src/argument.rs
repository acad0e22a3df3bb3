use mhb_core::{ErrorInfo, McmcError, McmcResult};
use serde::{Deserialize, Serialize};

/// Ordered set of numeric arrays handed to a [`crate::Likelihood`].
///
/// Raw bundles (one row per attached node) may be ragged; the bundle produced
/// by a bond's makers must be rectangular before evaluation.
pub type ArgumentBundle = Vec<Vec<f64>>;

/// Transform from raw parameter rows to a single likelihood argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ArgumentMaker {
    /// Passes row `source` through unchanged.
    Identity {
        /// Row of the raw bundle to forward.
        source: usize,
    },
    /// Repeats `value` once per entry of the first raw row.
    Constant {
        /// Value broadcast into every position.
        value: f64,
    },
    /// Broadcasts a per-group row across a longer target: `out[k] = bundle[source][mapping[k]]`.
    Group {
        /// Row holding the per-group values.
        source: usize,
        /// Group index for every output position.
        mapping: Vec<usize>,
    },
}

impl ArgumentMaker {
    /// Identity maker forwarding row `source`.
    pub fn identity(source: usize) -> Self {
        ArgumentMaker::Identity { source }
    }

    /// Constant maker repeating `value`.
    pub fn constant(value: f64) -> Self {
        ArgumentMaker::Constant { value }
    }

    /// Group maker broadcasting row `source` through `mapping`.
    pub fn group(source: usize, mapping: impl Into<Vec<usize>>) -> Self {
        ArgumentMaker::Group {
            source,
            mapping: mapping.into(),
        }
    }

    /// Builds the argument for the provided raw bundle.
    pub fn get_argument(&self, bundle: &[Vec<f64>]) -> McmcResult<Vec<f64>> {
        match self {
            ArgumentMaker::Identity { source } => Ok(row(bundle, *source)?.to_vec()),
            ArgumentMaker::Constant { value } => {
                let first = bundle.first().ok_or_else(|| {
                    McmcError::Shape(ErrorInfo::new(
                        "constant-empty-bundle",
                        "constant maker needs at least one row to size its output",
                    ))
                })?;
                Ok(vec![*value; first.len()])
            }
            ArgumentMaker::Group { source, mapping } => {
                let groups = row(bundle, *source)?;
                mapping
                    .iter()
                    .map(|&group| {
                        groups.get(group).copied().ok_or_else(|| {
                            McmcError::out_of_range("group-mapping", "group", group, groups.len())
                        })
                    })
                    .collect()
            }
        }
    }

    /// Raw row this maker reads, if any.
    pub fn source(&self) -> Option<usize> {
        match self {
            ArgumentMaker::Identity { source } | ArgumentMaker::Group { source, .. } => {
                Some(*source)
            }
            ArgumentMaker::Constant { .. } => None,
        }
    }
}

fn row(bundle: &[Vec<f64>], source: usize) -> McmcResult<&[f64]> {
    bundle
        .get(source)
        .map(Vec::as_slice)
        .ok_or_else(|| McmcError::out_of_range("maker-source", "argument row", source, bundle.len()))
}

/// Applies every maker in order, writing the results into `out`.
pub(crate) fn make_arguments(
    makers: &[ArgumentMaker],
    raw: &[Vec<f64>],
    out: &mut ArgumentBundle,
) -> McmcResult<()> {
    out.clear();
    for maker in makers {
        out.push(maker.get_argument(raw)?);
    }
    check_rectangular(out)
}

/// Fails with a shape error unless every row of `bundle` has the same length.
pub fn check_rectangular(bundle: &[Vec<f64>]) -> McmcResult<()> {
    let Some(first) = bundle.first() else {
        return Ok(());
    };
    let expected = first.len();
    for (index, arg) in bundle.iter().enumerate() {
        if arg.len() != expected {
            return Err(McmcError::Shape(
                ErrorInfo::new("ragged-bundle", "argument bundle is not rectangular")
                    .with_context("row", index)
                    .with_context("len", arg.len())
                    .with_context("expected", expected),
            ));
        }
    }
    Ok(())
}
