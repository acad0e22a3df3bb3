use std::fmt;

use mhb_core::{ErrorInfo, McmcError, McmcResult, NodeId};

use crate::argument::{make_arguments, ArgumentBundle, ArgumentMaker};
use crate::likelihood::Likelihood;
use crate::node::ParameterNode;

/// One additive term of the log-posterior.
///
/// A bond reads the committed values of its attached nodes (the position of a
/// node in [`Bond::nodes`] is its `whatami` index), turns them into likelihood
/// arguments with its maker family, and caches the last committed evaluation so
/// that moves of unrelated nodes never trigger a re-evaluation.
///
/// The staging rows are copied from the nodes once and then kept in step by
/// [`Bond::revise`], so every commit to an attached node must be followed by a
/// `revise` of this bond. [`Bond::invalidate`] resynchronizes from the nodes.
pub struct Bond {
    nodes: Vec<NodeId>,
    makers: Vec<ArgumentMaker>,
    likelihood: Box<dyn Likelihood>,
    current_value: f64,
    value_computed: bool,
    pending: Option<PendingMove>,
    staged: bool,
    staging: ArgumentBundle,
    args: ArgumentBundle,
}

impl Bond {
    /// Describes a bond over `nodes`; attach it with [`crate::Model::add_bond`].
    pub fn new(
        nodes: Vec<NodeId>,
        makers: Vec<ArgumentMaker>,
        likelihood: impl Likelihood + 'static,
    ) -> Self {
        Self::from_boxed(nodes, makers, Box::new(likelihood))
    }

    /// Same as [`Bond::new`] for an already boxed likelihood.
    pub fn from_boxed(
        nodes: Vec<NodeId>,
        makers: Vec<ArgumentMaker>,
        likelihood: Box<dyn Likelihood>,
    ) -> Self {
        let width = nodes.len();
        Self {
            nodes,
            makers,
            likelihood,
            current_value: 0.0,
            value_computed: false,
            pending: None,
            staged: false,
            staging: Vec::with_capacity(width),
            args: Vec::new(),
        }
    }

    /// Attached nodes in `whatami` order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Maker family applied before every evaluation.
    pub fn makers(&self) -> &[ArgumentMaker] {
        &self.makers
    }

    /// Diagnostic label of the likelihood.
    pub fn label(&self) -> &str {
        self.likelihood.label()
    }

    /// Cached value matching the last committed state, if one was computed.
    pub fn current_value(&self) -> Option<f64> {
        self.value_computed.then_some(self.current_value)
    }

    /// Value of the last evaluated candidate that has not been revised yet.
    pub fn pending_value(&self) -> Option<f64> {
        self.pending.map(|pending| pending.value)
    }

    /// Contribution of this bond to the acceptance log ratio for one candidate.
    ///
    /// The candidate replaces component `which` of the node at position
    /// `whatami`; the evaluation is stashed as pending until [`Bond::revise`].
    pub fn compute(
        &mut self,
        nodes: &[ParameterNode],
        whatami: usize,
        candidate: f64,
        which: usize,
    ) -> McmcResult<f64> {
        let target = *self.nodes.get(whatami).ok_or_else(|| {
            McmcError::out_of_range("bond-whatami", "attached node", whatami, self.nodes.len())
        })?;
        let width = lookup(nodes, target)?.len();
        if which >= width {
            return Err(McmcError::out_of_range("bond-which", "component", which, width));
        }

        self.pending = None;
        self.stage(nodes)?;
        let old = if self.value_computed {
            self.current_value
        } else {
            let value = self.evaluate()?;
            self.current_value = value;
            self.value_computed = true;
            value
        };
        let mut logr = -old;

        let committed = std::mem::replace(&mut self.staging[whatami][which], candidate);
        let evaluated = self.evaluate();
        self.staging[whatami][which] = committed;
        let new_value = evaluated?;
        self.pending = Some(PendingMove {
            value: new_value,
            whatami,
            which,
            candidate,
        });
        logr += new_value;
        Ok(logr)
    }

    /// Commits the pending evaluation as the cached value.
    pub fn revise(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.current_value = pending.value;
            self.value_computed = true;
            if self.staged {
                self.staging[pending.whatami][pending.which] = pending.candidate;
            }
        }
    }

    /// Returns the cached value, evaluating the committed state on first use.
    pub fn value(&mut self, nodes: &[ParameterNode]) -> McmcResult<f64> {
        if !self.value_computed {
            self.stage(nodes)?;
            self.current_value = self.evaluate()?;
            self.value_computed = true;
        }
        Ok(self.current_value)
    }

    /// Drops the cache so the next call re-evaluates from the nodes.
    pub fn invalidate(&mut self) {
        self.value_computed = false;
        self.pending = None;
        self.staged = false;
    }

    fn stage(&mut self, nodes: &[ParameterNode]) -> McmcResult<()> {
        if self.staged {
            return Ok(());
        }
        self.staging.clear();
        for &id in &self.nodes {
            self.staging.push(lookup(nodes, id)?.value().to_vec());
        }
        self.staged = true;
        Ok(())
    }

    fn evaluate(&mut self) -> McmcResult<f64> {
        make_arguments(&self.makers, &self.staging, &mut self.args)?;
        let value = self.likelihood.compute(&self.args);
        if !value.is_finite() {
            return Err(McmcError::Runtime(
                ErrorInfo::new("non-finite-likelihood", "likelihood returned a non-finite value")
                    .with_context("likelihood", self.likelihood.label())
                    .with_context("value", value),
            ));
        }
        Ok(value)
    }
}

/// Candidate evaluated by the last `compute`, waiting for `revise`.
#[derive(Debug, Clone, Copy)]
struct PendingMove {
    value: f64,
    whatami: usize,
    which: usize,
    candidate: f64,
}

fn lookup(nodes: &[ParameterNode], id: NodeId) -> McmcResult<&ParameterNode> {
    nodes.get(id.as_raw()).ok_or_else(|| {
        McmcError::Config(
            ErrorInfo::new("unknown-node", "bond references a node outside the model")
                .with_context("node", id),
        )
    })
}

impl fmt::Debug for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bond")
            .field("nodes", &self.nodes)
            .field("makers", &self.makers)
            .field("likelihood", &self.likelihood.label())
            .field("current_value", &self.current_value())
            .field("pending_value", &self.pending_value())
            .finish_non_exhaustive()
    }
}
