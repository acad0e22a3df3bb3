use std::collections::BTreeMap;
use std::path::PathBuf;

use mhb_core::{DrawStream, McmcError, NodeId};
use mhb_graph::{Model, ParameterNode, RunContext, SweepReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::manifest::{self, RunManifest};
use crate::trace::{TraceRecorder, TraceSample};

/// Acceptance report for one sampled node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeAcceptance {
    /// Name of the node.
    pub name: String,
    /// Accepted proposals per component (post burn-in).
    pub counts: Vec<u64>,
    /// Proposals attempted per component (post burn-in).
    pub proposals: u64,
    /// `counts / proposals` per component.
    pub rates: Vec<f64>,
}

impl NodeAcceptance {
    fn from_node(node: &ParameterNode, proposals: u64) -> Self {
        let counts = node.acceptance_counts().to_vec();
        let rates = counts
            .iter()
            .map(|&count| {
                if proposals == 0 {
                    0.0
                } else {
                    count as f64 / proposals as f64
                }
            })
            .collect();
        Self {
            name: node.name().to_string(),
            counts,
            proposals,
            rates,
        }
    }
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Passes recorded after burn-in.
    pub sweeps: usize,
    /// Acceptance report per sampled node, in model order.
    pub acceptance: Vec<NodeAcceptance>,
    /// Final committed values of every sampled node.
    pub final_values: BTreeMap<String, Vec<f64>>,
    /// Log-posterior at the final state.
    pub log_posterior: f64,
    /// Trace CSV written during the run.
    pub trace_path: Option<PathBuf>,
    /// Manifest path, if emitted.
    pub manifest_path: Option<PathBuf>,
    /// Trace samples collected (useful for tests/diagnostics).
    pub samples: Vec<TraceSample>,
}

/// Sweeps every node of the model once, in insertion order.
///
/// Constant nodes are visited but return skipped reports.
pub fn sweep_all<P, A>(
    model: &mut Model,
    ctx: &mut RunContext<P, A>,
) -> Result<Vec<SweepReport>, McmcError>
where
    P: DrawStream,
    A: DrawStream,
{
    let ids: Vec<NodeId> = model.node_ids().collect();
    let mut reports = Vec::with_capacity(ids.len());
    for id in ids {
        reports.push(model.run_update_sweep(id, ctx)?);
    }
    Ok(reports)
}

/// Runs the sampler with streams derived from the configured master seed.
pub fn run(model: &mut Model, config: &RunConfig) -> Result<RunSummary, McmcError> {
    let mut ctx = RunContext::from_seed(config.seed_policy.master_seed);
    run_with_context(model, config, &mut ctx)
}

/// Runs the sampler with caller-supplied streams.
pub fn run_with_context<P, A>(
    model: &mut Model,
    config: &RunConfig,
    ctx: &mut RunContext<P, A>,
) -> Result<RunSummary, McmcError>
where
    P: DrawStream,
    A: DrawStream,
{
    config.validate()?;
    let sampled: Vec<NodeId> = model
        .nodes()
        .iter()
        .zip(model.node_ids())
        .filter(|(node, _)| !node.is_constant())
        .map(|(_, id)| id)
        .collect();
    if sampled.is_empty() {
        warn!("model has no sampled nodes; sweeps will not move");
    }
    info!(
        sweeps = config.sweeps,
        burn_in = config.burn_in,
        thinning = config.thinning,
        nodes = sampled.len(),
        seed = config.seed_policy.master_seed,
        "starting run"
    );

    for pass in 0..config.burn_in {
        let reports = sweep_all(model, ctx)?;
        debug!(pass, accepted = total_accepted(&reports), "burn-in pass");
    }
    model.reset_acceptance_counts();

    let mut recorder = TraceRecorder::new();
    for sweep in 0..config.sweeps {
        let reports = sweep_all(model, ctx)?;
        debug!(sweep, accepted = total_accepted(&reports), "pass complete");
        if sweep % config.thinning == 0 {
            for &id in &sampled {
                let node = model.node(id)?;
                recorder.push(TraceSample {
                    sweep,
                    node: node.name().to_string(),
                    values: node.value().to_vec(),
                });
            }
        }
    }

    let mut acceptance = Vec::with_capacity(sampled.len());
    let mut final_values = BTreeMap::new();
    for &id in &sampled {
        let node = model.node(id)?;
        acceptance.push(NodeAcceptance::from_node(node, config.sweeps as u64));
        final_values.insert(node.name().to_string(), node.value().to_vec());
    }
    let log_posterior = model.log_posterior()?;

    let mut trace_path = None;
    let mut manifest_path = None;
    if let Some(run_dir) = config.output.run_directory.clone() {
        let path = run_dir.join(&config.output.trace_file);
        recorder.write_csv(&path)?;

        let manifest = RunManifest {
            config: config.clone(),
            master_seed: config.seed_policy.master_seed,
            seed_label: config.seed_policy.label.clone(),
            values_hash: manifest::values_hash(&final_values),
            log_posterior,
            acceptance: acceptance.clone(),
            trace_file: Some(config.output.trace_file.clone()),
            provenance: manifest::current_provenance(config.seed_policy.master_seed),
        };
        let target = run_dir.join(&config.output.manifest_file);
        manifest.write(&target)?;
        trace_path = Some(path);
        manifest_path = Some(target);
    }

    info!(
        log_posterior,
        samples = recorder.samples().len(),
        "run complete"
    );

    Ok(RunSummary {
        sweeps: config.sweeps,
        acceptance,
        final_values,
        log_posterior,
        trace_path,
        manifest_path,
        samples: recorder.into_samples(),
    })
}

fn total_accepted(reports: &[SweepReport]) -> usize {
    reports.iter().map(SweepReport::accepted).sum()
}
