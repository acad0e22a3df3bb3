//! Structured error types shared across mhbond crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`McmcError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (node names, indices, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for model construction and sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum McmcError {
    /// Invalid model or run configuration (length mismatches, bond caps, unknown ids).
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Out-of-bounds component, parameter, or argument index.
    #[error("range error: {0}")]
    Range(ErrorInfo),
    /// Argument bundle that is not rectangular at evaluation time.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Numerical failure during a sweep, such as a non-finite likelihood.
    #[error("runtime error: {0}")]
    Runtime(ErrorInfo),
    /// Serialization, schema, and artefact IO errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl McmcError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            McmcError::Config(info)
            | McmcError::Range(info)
            | McmcError::Shape(info)
            | McmcError::Runtime(info)
            | McmcError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Builds a range error for `index` falling outside `[0, len)`.
    pub fn out_of_range(code: &str, what: &str, index: usize, len: usize) -> Self {
        McmcError::Range(
            ErrorInfo::new(code, format!("{what} index out of range"))
                .with_context("index", index)
                .with_context("len", len),
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type McmcResult<T> = Result<T, McmcError>;
