use std::fs;
use std::path::{Path, PathBuf};

use mhb_core::errors::ErrorInfo;
use mhb_core::McmcError;
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of recorded passes over the model (post burn-in).
    #[serde(default = "default_sweeps")]
    pub sweeps: usize,
    /// Number of initial passes discarded before counting and recording.
    #[serde(default)]
    pub burn_in: usize,
    /// Record every `thinning`-th pass.
    #[serde(default = "default_thinning")]
    pub thinning: usize,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output directory configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_sweeps() -> usize {
    1000
}

fn default_thinning() -> usize {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sweeps: default_sweeps(),
            burn_in: 0,
            thinning: default_thinning(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, McmcError> {
        let config: RunConfig = serde_yaml::from_str(yaml).map_err(|err| {
            McmcError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a YAML file.
    pub fn from_yaml_path(path: &Path) -> Result<Self, McmcError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| match err {
            McmcError::Serde(info) => {
                McmcError::Serde(info.with_context("path", path.display()))
            }
            other => other,
        })
    }

    /// Checks invariants serde defaults cannot express.
    pub fn validate(&self) -> Result<(), McmcError> {
        if self.thinning == 0 {
            return Err(McmcError::Config(
                ErrorInfo::new("zero-thinning", "thinning interval must be at least 1")
                    .with_hint("use thinning: 1 to record every pass"),
            ));
        }
        Ok(())
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed from which the proposal and acceptance streams are derived.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Output directory layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts; nothing is written when unset.
    #[serde(default)]
    pub run_directory: Option<PathBuf>,
    /// Trace filename relative to `run_directory`.
    #[serde(default = "default_trace_filename")]
    pub trace_file: PathBuf,
    /// Manifest filename relative to `run_directory`.
    #[serde(default = "default_manifest_filename")]
    pub manifest_file: PathBuf,
}

fn default_trace_filename() -> PathBuf {
    PathBuf::from("trace.csv")
}

fn default_manifest_filename() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            run_directory: None,
            trace_file: default_trace_filename(),
            manifest_file: default_manifest_filename(),
        }
    }
}
