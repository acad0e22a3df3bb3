use std::collections::BTreeSet;

use indexmap::IndexMap;
use mhb_core::{BondId, ErrorInfo, McmcError, McmcResult, NodeId};
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::node::{BondLink, ParameterNode};

/// Structural limits applied while a model is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Maximum number of bonds a single parameter node may feed.
    #[serde(default = "default_max_bonds")]
    pub max_bonds_per_node: usize,
}

fn default_max_bonds() -> usize {
    100
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_bonds_per_node: default_max_bonds(),
        }
    }
}

/// Arena owning every parameter node and bond of a model.
///
/// Nodes and bonds refer to each other through [`NodeId`] and [`BondId`]
/// indices only; the arena is the single owner of both.
#[derive(Debug, Default)]
pub struct Model {
    pub(crate) config: ModelConfig,
    pub(crate) nodes: Vec<ParameterNode>,
    pub(crate) bonds: Vec<Bond>,
    names: IndexMap<String, NodeId>,
}

impl Model {
    /// Creates an empty model with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty model with explicit limits.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Limits the model was built with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Adds a node; names must be unique within the model.
    pub fn add_node(&mut self, node: ParameterNode) -> McmcResult<NodeId> {
        if self.names.contains_key(node.name()) {
            return Err(McmcError::Config(
                ErrorInfo::new("duplicate-node", "node name already used in this model")
                    .with_context("node", node.name()),
            ));
        }
        let id = NodeId::from_raw(self.nodes.len());
        self.names.insert(node.name().to_owned(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Adds a bond and registers it on every attached node.
    ///
    /// Validation happens before any back-reference is written, so a failed
    /// call leaves the model unchanged.
    pub fn add_bond(&mut self, bond: Bond) -> McmcResult<BondId> {
        let id = BondId::from_raw(self.bonds.len());
        let attached = bond.nodes();
        if attached.is_empty() {
            return Err(McmcError::Config(ErrorInfo::new(
                "empty-bond",
                "bond must depend on at least one node",
            )));
        }
        let mut seen = BTreeSet::new();
        for &node in attached {
            let record = self.node(node)?;
            if !seen.insert(node) {
                return Err(McmcError::Config(
                    ErrorInfo::new("duplicate-attachment", "node attached twice to one bond")
                        .with_context("node", record.name()),
                ));
            }
            if record.bonds().len() >= self.config.max_bonds_per_node {
                return Err(McmcError::Config(
                    ErrorInfo::new("bond-cap", "parameter node exceeds its bond limit")
                        .with_context("node", record.name())
                        .with_context("max_bonds", self.config.max_bonds_per_node)
                        .with_hint("raise ModelConfig::max_bonds_per_node"),
                ));
            }
        }
        for maker in bond.makers() {
            if let Some(source) = maker.source() {
                if source >= attached.len() {
                    return Err(McmcError::Config(
                        ErrorInfo::new("maker-source", "argument maker reads a missing row")
                            .with_context("source", source)
                            .with_context("rows", attached.len()),
                    ));
                }
            }
        }

        for (whatami, &node) in attached.iter().enumerate() {
            self.nodes[node.as_raw()].attach(
                BondLink { bond: id, whatami },
                self.config.max_bonds_per_node,
            )?;
        }
        self.bonds.push(bond);
        Ok(id)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> McmcResult<&ParameterNode> {
        self.nodes.get(id.as_raw()).ok_or_else(|| {
            McmcError::out_of_range("node-id", "parameter node", id.as_raw(), self.nodes.len())
        })
    }

    /// Looks up a node id by its name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Looks up a bond by id.
    pub fn bond(&self, id: BondId) -> McmcResult<&Bond> {
        self.bonds.get(id.as_raw()).ok_or_else(|| {
            McmcError::out_of_range("bond-id", "bond", id.as_raw(), self.bonds.len())
        })
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[ParameterNode] {
        &self.nodes
    }

    /// All bonds in insertion order.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Node identifiers in insertion order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from_raw)
    }

    /// Delta a bond would contribute if `candidate` replaced component `which`
    /// of its node at position `whatami`. Nothing is committed.
    pub fn evaluate_bond(
        &mut self,
        bond: BondId,
        whatami: usize,
        candidate: f64,
        which: usize,
    ) -> McmcResult<f64> {
        let len = self.bonds.len();
        let target = self
            .bonds
            .get_mut(bond.as_raw())
            .ok_or_else(|| McmcError::out_of_range("bond-id", "bond", bond.as_raw(), len))?;
        target.compute(&self.nodes, whatami, candidate, which)
    }

    /// Sum of every bond's value at the committed state.
    pub fn log_posterior(&mut self) -> McmcResult<f64> {
        let mut total = 0.0;
        for bond in &mut self.bonds {
            total += bond.value(&self.nodes)?;
        }
        Ok(total)
    }

    /// Zeroes every node's acceptance counts, e.g. at the end of burn-in.
    pub fn reset_acceptance_counts(&mut self) {
        self.nodes.iter_mut().for_each(ParameterNode::reset_counts);
    }
}
