use std::fmt;

use mhb_core::{DrawStream, ErrorInfo, McmcError, McmcResult, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::context::RunContext;
use crate::model::Model;
use crate::node::BondLink;

/// Verdict of a single Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Candidate committed into the node.
    Accepted,
    /// Candidate discarded.
    Rejected,
}

impl StepStatus {
    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Accepted => "accepted",
            StepStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one component update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Node that was updated.
    pub node: NodeId,
    /// Component index within the node.
    pub component: usize,
    /// Proposed value.
    pub candidate: f64,
    /// Summed bond deltas, `log p(candidate) - log p(current)`.
    pub log_ratio: f64,
    /// Uniform variate the acceptance probability was compared against.
    pub draw: f64,
    /// Whether the candidate was committed.
    pub status: StepStatus,
}

impl StepOutcome {
    /// Human readable acceptance status.
    pub fn status(&self) -> &'static str {
        self.status.as_str()
    }

    /// Whether the candidate was committed.
    pub fn accepted(&self) -> bool {
        self.status == StepStatus::Accepted
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {} (candidate {:.6}, log ratio {:.6})",
            self.node, self.component, self.status, self.candidate, self.log_ratio
        )
    }
}

/// Result of sweeping every component of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Node that was swept.
    pub node: NodeId,
    /// True when the node is constant and nothing was attempted.
    pub skipped: bool,
    /// One outcome per component, in component order.
    pub steps: Vec<StepOutcome>,
}

impl SweepReport {
    fn skipped(node: NodeId) -> Self {
        Self {
            node,
            skipped: true,
            steps: Vec::new(),
        }
    }

    /// Number of accepted steps.
    pub fn accepted(&self) -> usize {
        self.steps.iter().filter(|step| step.accepted()).count()
    }

    /// Number of attempted steps.
    pub fn proposed(&self) -> usize {
        self.steps.len()
    }
}

impl Model {
    /// Runs one random-walk Metropolis sweep over every component of `id`.
    ///
    /// Constant nodes return immediately without drawing. Any error aborts the
    /// sweep; components updated before the failure keep their new values.
    pub fn run_update_sweep<P, A>(
        &mut self,
        id: NodeId,
        ctx: &mut RunContext<P, A>,
    ) -> McmcResult<SweepReport>
    where
        P: DrawStream,
        A: DrawStream,
    {
        let node = self.node(id)?;
        if node.is_constant() {
            return Ok(SweepReport::skipped(id));
        }
        let links = node.bonds().to_vec();
        let width = node.len();

        let mut steps = Vec::with_capacity(width);
        for component in 0..width {
            let outcome = self.update_component(id, component, &links, ctx)?;
            trace!(
                node = %id,
                component,
                candidate = outcome.candidate,
                log_ratio = outcome.log_ratio,
                status = outcome.status(),
                "metropolis step"
            );
            steps.push(outcome);
        }
        let report = SweepReport {
            node: id,
            skipped: false,
            steps,
        };
        debug!(
            node = %id,
            accepted = report.accepted(),
            proposed = report.proposed(),
            "sweep complete"
        );
        Ok(report)
    }

    /// Runs a single Metropolis step on component `component` of `id`.
    pub fn step_component<P, A>(
        &mut self,
        id: NodeId,
        component: usize,
        ctx: &mut RunContext<P, A>,
    ) -> McmcResult<StepOutcome>
    where
        P: DrawStream,
        A: DrawStream,
    {
        let node = self.node(id)?;
        node.check_component(component)?;
        if node.is_constant() {
            return Err(McmcError::Config(
                ErrorInfo::new("constant-node", "constant nodes cannot be stepped")
                    .with_context("node", node.name()),
            ));
        }
        let links = node.bonds().to_vec();
        self.update_component(id, component, &links, ctx)
    }

    fn update_component<P, A>(
        &mut self,
        id: NodeId,
        component: usize,
        links: &[BondLink],
        ctx: &mut RunContext<P, A>,
    ) -> McmcResult<StepOutcome>
    where
        P: DrawStream,
        A: DrawStream,
    {
        let index = id.as_raw();
        let candidate = self.nodes[index].propose_component(component, ctx.proposal_mut())?;

        let mut log_ratio = 0.0;
        for link in links {
            log_ratio += self.bonds[link.bond.as_raw()].compute(
                &self.nodes,
                link.whatami,
                candidate,
                component,
            )?;
        }
        if !log_ratio.is_finite() {
            return Err(McmcError::Runtime(
                ErrorInfo::new("non-finite-ratio", "acceptance log ratio is not finite")
                    .with_context("node", self.nodes[index].name())
                    .with_context("component", component)
                    .with_context("log_ratio", log_ratio),
            ));
        }

        let draw = ctx.acceptance_mut().uniform();
        let status = if log_ratio.exp() > draw {
            self.nodes[index].commit(component, candidate);
            for link in links {
                self.bonds[link.bond.as_raw()].revise();
            }
            StepStatus::Accepted
        } else {
            StepStatus::Rejected
        };

        Ok(StepOutcome {
            node: id,
            component,
            candidate,
            log_ratio,
            draw,
            status,
        })
    }
}
