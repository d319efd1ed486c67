//! Structured error types shared across the V-HIVRAP crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HivError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code (dotted, e.g. `store.missing`).
    pub code: String,
    /// Human readable diagnostic message shown to the user.
    pub message: String,
    /// Contextual key value pairs (field names, offending values, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint telling the user how to correct the input.
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the simulation core.
///
/// None of the families are fatal and none are retried: every error is handed
/// back to the presentation layer, which shows it and lets the user correct the
/// input or try again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HivError {
    /// Out-of-range, non-finite or non-positive numeric input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(ErrorInfo),
    /// Malformed scenario name.
    #[error("invalid scenario name: {0}")]
    InvalidName(ErrorInfo),
    /// Scenario absent from its namespace.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// Persistence read/write failure, including corrupt stored data.
    #[error("io error: {0}")]
    Io(ErrorInfo),
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

impl HivError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HivError::InvalidParameter(info)
            | HivError::InvalidName(info)
            | HivError::NotFound(info)
            | HivError::Io(info) => info,
        }
    }

    /// Shorthand for an [`HivError::InvalidParameter`] naming the offending field.
    pub fn invalid_parameter(field: &str, message: impl Into<String>) -> Self {
        HivError::InvalidParameter(
            ErrorInfo::new(format!("params.{field}"), message).with_context("field", field),
        )
    }

    /// Wraps an I/O style failure with a stable code and the underlying reason.
    pub fn io(code: &str, err: impl ToString) -> Self {
        HivError::Io(ErrorInfo::new(code, err.to_string()))
    }
}
