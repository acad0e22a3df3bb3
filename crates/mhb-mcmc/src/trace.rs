use std::fs;
use std::path::Path;

use mhb_core::{ErrorInfo, McmcError};
use serde::{Deserialize, Serialize};

/// Values of one node recorded after a pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceSample {
    /// Pass number (post burn-in) when the sample was recorded.
    pub sweep: usize,
    /// Name of the node.
    pub node: String,
    /// Committed values at the end of the pass.
    pub values: Vec<f64>,
}

/// Collects trace samples for CSV export.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    samples: Vec<TraceSample>,
}

impl TraceRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    pub fn push(&mut self, sample: TraceSample) {
        self.samples.push(sample);
    }

    /// Recorded samples in insertion order.
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Consumes the recorder and returns its samples.
    pub fn into_samples(self) -> Vec<TraceSample> {
        self.samples
    }

    /// Writes one `sweep,node,component,value` record per recorded component.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), McmcError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                McmcError::Serde(
                    ErrorInfo::new("trace-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let mut wtr = csv::Writer::from_path(path).map_err(|err| trace_error(path, err))?;
        wtr.write_record(["sweep", "node", "component", "value"])
            .map_err(|err| trace_error(path, err))?;
        for sample in &self.samples {
            for (component, value) in sample.values.iter().enumerate() {
                wtr.write_record([
                    sample.sweep.to_string(),
                    sample.node.clone(),
                    component.to_string(),
                    format!("{value:.12}"),
                ])
                .map_err(|err| trace_error(path, err))?;
            }
        }
        wtr.flush().map_err(|err| {
            McmcError::Serde(
                ErrorInfo::new("trace-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}

fn trace_error(path: &Path, err: csv::Error) -> McmcError {
    McmcError::Serde(
        ErrorInfo::new("trace-write", err.to_string()).with_context("path", path.display()),
    )
}
