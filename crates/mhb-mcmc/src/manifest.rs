use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use mhb_core::errors::ErrorInfo;
use mhb_core::{McmcError, RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::RunConfig;
use crate::kernel::NodeAcceptance;

/// Structured manifest describing a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run.
    pub config: RunConfig,
    /// Master seed used to derive the proposal and acceptance streams.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// SHA-256 of the final node values.
    pub values_hash: String,
    /// Log-posterior at the final state.
    pub log_posterior: f64,
    /// Per-node acceptance report.
    pub acceptance: Vec<NodeAcceptance>,
    /// Trace file produced during the run (relative to run directory).
    pub trace_file: Option<PathBuf>,
    /// Seed, timestamp, and tool versions.
    pub provenance: RunProvenance,
}

impl RunManifest {
    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), McmcError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                McmcError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, McmcError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}

/// Canonical hash of named node values; order-independent in the names.
pub fn values_hash(values: &BTreeMap<String, Vec<f64>>) -> String {
    let mut hasher = Sha256::new();
    hasher.update((values.len() as u64).to_le_bytes());
    for (name, entries) in values {
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update((entries.len() as u64).to_le_bytes());
        for value in entries {
            hasher.update(value.to_bits().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Provenance stamped with the current time and this crate's version.
pub fn current_provenance(seed: u64) -> RunProvenance {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    RunProvenance {
        schema_version: SchemaVersion::new(1, 0, 0),
        seed,
        created_at: chrono::Utc::now().to_rfc3339(),
        tool_versions,
    }
}
