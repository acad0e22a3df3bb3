use mhb_core::{BondId, DrawStream, ErrorInfo, McmcError, McmcResult};
use serde::{Deserialize, Serialize};

/// Back-reference from a node to a bond that reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondLink {
    /// Bond depending on the node.
    pub bond: BondId,
    /// Position of the node within the bond's attached-node list.
    pub whatami: usize,
}

/// Mutable vector quantity sampled component by component.
#[derive(Debug, Clone)]
pub struct ParameterNode {
    name: String,
    value: Vec<f64>,
    step_sizes: Vec<f64>,
    acceptance_counts: Vec<u64>,
    constant: bool,
    bonds: Vec<BondLink>,
}

impl ParameterNode {
    /// Creates a sampled node from initial values and per-component step sizes.
    pub fn new(
        name: impl Into<String>,
        value: Vec<f64>,
        step_sizes: Vec<f64>,
    ) -> McmcResult<Self> {
        let name = name.into();
        if step_sizes.len() != value.len() {
            return Err(McmcError::Config(
                ErrorInfo::new("step-size-length", "step sizes must match values")
                    .with_context("node", &name)
                    .with_context("values", value.len())
                    .with_context("step_sizes", step_sizes.len())
                    .with_hint("supply one step size per component"),
            ));
        }
        if value.is_empty() {
            return Err(McmcError::Config(
                ErrorInfo::new("empty-node", "parameter node needs at least one component")
                    .with_context("node", &name),
            ));
        }
        if let Some(index) = value.iter().position(|v| !v.is_finite()) {
            return Err(McmcError::Config(
                ErrorInfo::new("non-finite-value", "initial value is not finite")
                    .with_context("node", &name)
                    .with_context("component", index),
            ));
        }
        if let Some(index) = step_sizes
            .iter()
            .position(|s| !s.is_finite() || *s < 0.0)
        {
            return Err(McmcError::Config(
                ErrorInfo::new("invalid-step-size", "step size must be finite and non-negative")
                    .with_context("node", &name)
                    .with_context("component", index),
            ));
        }
        let acceptance_counts = vec![0; value.len()];
        Ok(Self {
            name,
            value,
            step_sizes,
            acceptance_counts,
            constant: false,
            bonds: Vec::new(),
        })
    }

    /// Creates a node whose values never change, such as observed data.
    pub fn constant(name: impl Into<String>, value: Vec<f64>) -> McmcResult<Self> {
        let step_sizes = vec![0.0; value.len()];
        let mut node = Self::new(name, value, step_sizes)?;
        node.constant = true;
        Ok(node)
    }

    /// Name supplied at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current committed values.
    pub fn value(&self) -> &[f64] {
        &self.value
    }

    /// Random-walk step size per component.
    pub fn step_sizes(&self) -> &[f64] {
        &self.step_sizes
    }

    /// Accepted proposals per component.
    pub fn acceptance_counts(&self) -> &[u64] {
        &self.acceptance_counts
    }

    /// Whether sweeps skip this node.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Bonds reading this node, in attachment order.
    pub fn bonds(&self) -> &[BondLink] {
        &self.bonds
    }

    /// Draws `value[i] + step_sizes[i] * N(0,1)` from the proposal stream.
    pub fn propose_component<S: DrawStream + ?Sized>(
        &self,
        index: usize,
        proposal: &mut S,
    ) -> McmcResult<f64> {
        self.check_component(index)?;
        Ok(self.value[index] + self.step_sizes[index] * proposal.standard_normal())
    }

    pub(crate) fn check_component(&self, index: usize) -> McmcResult<()> {
        if index >= self.value.len() {
            return Err(McmcError::out_of_range(
                "component-index",
                "component",
                index,
                self.value.len(),
            ));
        }
        Ok(())
    }

    pub(crate) fn commit(&mut self, index: usize, candidate: f64) {
        self.value[index] = candidate;
        self.acceptance_counts[index] += 1;
    }

    pub(crate) fn attach(&mut self, link: BondLink, max_bonds: usize) -> McmcResult<()> {
        if self.bonds.len() >= max_bonds {
            return Err(McmcError::Config(
                ErrorInfo::new("bond-cap", "parameter node exceeds its bond limit")
                    .with_context("node", &self.name)
                    .with_context("max_bonds", max_bonds)
                    .with_hint("raise ModelConfig::max_bonds_per_node"),
            ));
        }
        self.bonds.push(link);
        Ok(())
    }

    pub(crate) fn reset_counts(&mut self) {
        self.acceptance_counts.iter_mut().for_each(|count| *count = 0);
    }
}
