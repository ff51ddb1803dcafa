//! Input validation for plan options and interface intent.
//!
//! This module provides the [`Validatable`] trait used to check raw
//! configuration input before it touches the plan. Every check reports
//! the offending field so callers can surface precise messages, and a
//! failed validation never leaves the plan partially modified.
//!
//! # Example
//!
//! ```rust
//! use nplan::validation::{validate_prefix, validate_renderer};
//!
//! assert!(validate_renderer("networkd", "renderer").is_valid());
//! assert!(!validate_renderer("wicked", "renderer").is_valid());
//! assert!(!validate_prefix(33, "prefix").is_valid());
//! ```

use crate::error::{Error, ValidationErrorInfo};
use crate::plan::Renderer;
use crate::util::addr;

/// Outcome of checking a piece of input.
///
/// Errors reject the input; warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationErrorInfo>,
    pub warnings: Vec<ValidationErrorInfo>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationErrorInfo::new(field, message));
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationErrorInfo::new(field, message));
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Log the warnings, then fail with every recorded error, if any.
    pub fn into_result(self) -> Result<(), Error> {
        for warning in &self.warnings {
            tracing::warn!(field = %warning.field, "{}", warning.message);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// Input checked before it reaches the plan.
pub trait Validatable {
    fn validate(&self) -> ValidationResult;
}

/// Validate that a required string is present and non-empty.
pub fn validate_required(value: Option<&str>, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    match value {
        None => result.add_error(field, "is required"),
        Some("") => result.add_error(field, "must not be empty"),
        Some(_) => {}
    }

    result
}

/// Validate a renderer name.
pub fn validate_renderer(value: &str, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if value.parse::<Renderer>().is_err() {
        result.add_error(
            field,
            format!("must be one of networkd, NetworkManager, got '{}'", value),
        );
    }

    result
}

/// Validate a configuration file path.
///
/// The path must be absolute and no component may contain a space.
pub fn validate_config_path(value: &str, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !value.starts_with('/') {
        result.add_error(field, format!("must be an absolute path, got '{}'", value));
    } else if value.contains(' ') {
        result.add_error(field, format!("must not contain spaces, got '{}'", value));
    }

    result
}

/// Validate an IP address string (IPv4 or IPv6).
pub fn validate_ip(value: &str, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if addr::parse_addr(value).is_err() {
        result.add_error(field, format!("must be a valid IP address, got '{}'", value));
    }

    result
}

/// Validate an IPv4 prefix length.
pub fn validate_prefix(prefix: u32, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if prefix > 32 {
        result.add_error(field, format!("must be 0-32, got {}", prefix));
    }

    result
}

/// Validate a DNS domain name.
pub fn validate_domain(value: &str, field: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Err(e) = addr::validate_domain(value) {
        result.add_error(field, e.to_string());
    }

    result
}
