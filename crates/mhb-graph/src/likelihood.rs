use serde::{Deserialize, Serialize};

/// Natural log of `sqrt(2π)`.
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Pure log-density contribution of one bond.
///
/// The positional meaning of each argument row is fixed by the owning bond's
/// maker order; implementations only see numbers. Returning a non-finite value
/// aborts the sweep that requested the evaluation.
pub trait Likelihood: Send + Sync {
    /// Evaluates the log-density for a rectangular argument bundle.
    fn compute(&self, args: &[Vec<f64>]) -> f64;

    /// Short label used in diagnostics.
    fn label(&self) -> &str {
        "custom"
    }
}

/// Likelihood that contributes nothing; useful as an improper flat prior.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

impl Likelihood for Flat {
    fn compute(&self, _args: &[Vec<f64>]) -> f64 {
        0.0
    }

    fn label(&self) -> &str {
        "flat"
    }
}

/// Sum of standard-normal log-densities over the first argument row.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNormal;

impl Likelihood for StandardNormal {
    fn compute(&self, args: &[Vec<f64>]) -> f64 {
        args.first()
            .map(|xs| xs.iter().map(|&x| normal_logpdf(x, 0.0, 1.0)).sum())
            .unwrap_or(0.0)
    }

    fn label(&self) -> &str {
        "standard-normal"
    }
}

/// Interpretation of the scale row of a [`Normal`] likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleParam {
    /// Third row holds `sigma` directly; non-positive values yield NaN.
    #[default]
    Sigma,
    /// Third row holds `ln sigma`, so every real value is admissible.
    Log,
}

/// Independent normal observations over rows `[x, mu, scale]`.
///
/// Returns NaN when fewer than three rows are supplied or when a direct
/// `sigma` is not strictly positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normal {
    /// How the scale row is read.
    pub scale: ScaleParam,
}

impl Normal {
    /// Normal likelihood reading `sigma` directly.
    pub fn with_sigma() -> Self {
        Self {
            scale: ScaleParam::Sigma,
        }
    }

    /// Normal likelihood reading `ln sigma`.
    pub fn with_log_sigma() -> Self {
        Self {
            scale: ScaleParam::Log,
        }
    }
}

impl Likelihood for Normal {
    fn compute(&self, args: &[Vec<f64>]) -> f64 {
        let [xs, mus, scales, ..] = args else {
            return f64::NAN;
        };
        xs.iter()
            .zip(mus)
            .zip(scales)
            .map(|((&x, &mu), &scale)| match self.scale {
                ScaleParam::Sigma if scale > 0.0 => normal_logpdf(x, mu, scale),
                ScaleParam::Sigma => f64::NAN,
                ScaleParam::Log => {
                    let z = (x - mu) * (-scale).exp();
                    -0.5 * z * z - scale - LN_SQRT_2PI
                }
            })
            .sum()
    }

    fn label(&self) -> &str {
        match self.scale {
            ScaleParam::Sigma => "normal",
            ScaleParam::Log => "normal-log-scale",
        }
    }
}

/// Adapter turning a closure into a [`Likelihood`].
pub struct FnLikelihood<F> {
    label: String,
    func: F,
}

impl<F> FnLikelihood<F>
where
    F: Fn(&[Vec<f64>]) -> f64 + Send + Sync,
{
    /// Wraps `func` under the diagnostic label `label`.
    pub fn new(label: impl Into<String>, func: F) -> Self {
        Self {
            label: label.into(),
            func,
        }
    }
}

impl<F> Likelihood for FnLikelihood<F>
where
    F: Fn(&[Vec<f64>]) -> f64 + Send + Sync,
{
    fn compute(&self, args: &[Vec<f64>]) -> f64 {
        (self.func)(args)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Log-PDF of `N(mu, sigma)` at `x`.
///
/// `log p(x) = -0.5 * ((x-mu)/sigma)^2 - ln(sigma) - ln(sqrt(2π))`
pub fn normal_logpdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    -0.5 * z * z - sigma.ln() - LN_SQRT_2PI
}
