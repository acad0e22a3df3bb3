#![deny(missing_docs)]

//! Run driver for mhbond models: repeated sweeps, burn-in and thinning,
//! trace recording, and run manifests.

/// YAML configuration schema and defaults.
pub mod config;
/// Sweep loop and public `run` entry points.
pub mod kernel;
/// Run manifest serialization helpers.
pub mod manifest;
/// Trace collection and CSV export.
pub mod trace;

pub use config::{OutputConfig, RunConfig, SeedPolicy};
pub use kernel::{run, run_with_context, sweep_all, NodeAcceptance, RunSummary};
pub use manifest::RunManifest;
pub use trace::{TraceRecorder, TraceSample};
