#![deny(missing_docs)]
#![doc = "Core error taxonomy, arena identifiers, and deterministic randomness for the mhbond sampler."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, McmcError, McmcResult};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, DrawStream, RngHandle, ScriptedStream};

/// Identifier for a parameter node within a model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a new identifier from its raw arena index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw arena index of the identifier.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Identifier for a bond within a model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BondId(usize);

impl BondId {
    /// Creates a new identifier from its raw arena index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw arena index of the identifier.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bond#{}", self.0)
    }
}
