//! Error types for plan and status operations.

use std::fmt;
use std::io;

/// Result type for nplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrorInfo {
    /// Field that failed validation.
    pub field: String,
    /// Description of the violated constraint.
    pub message: String,
}

impl ValidationErrorInfo {
    /// Create a new validation error entry.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.field, self.message)
    }
}

fn join_errors(errors: &[ValidationErrorInfo]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Errors that can occur while building, persisting or applying a plan.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input violated the configuration schema.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationErrorInfo>),

    /// Interface type outside of ethernet/wifi.
    #[error("unsupported interface type: {0}")]
    UnsupportedType(String),

    /// A required executable could not be located.
    #[error("{0} binary not found")]
    BinaryNotFound(String),

    /// An external command exited unsuccessfully.
    #[error("{binary} failed with code {} using args '{}'", display_code(.code), .args.join(" "))]
    Execution {
        /// The executable that was run.
        binary: String,
        /// Arguments passed to it.
        args: Vec<String>,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Captured standard output, trimmed.
        stdout: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// I/O error from the filesystem or process spawning.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Build a validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationErrorInfo::new(field, message)])
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a "binary not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BinaryNotFound(_))
    }

    /// Get the exit code if this is an execution error.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution { code, .. } => *code,
            _ => None,
        }
    }

    /// Get the captured stderr if this is an execution error.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Execution { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Get the fields that failed validation, if any.
    pub fn validation_errors(&self) -> &[ValidationErrorInfo] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}
