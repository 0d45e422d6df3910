//! Error handling for recon-config
//!
//! This module defines the error infrastructure for configuration loading:
//! - `ReconError` trait for consistent error handling
//! - `ConfigurationError` covering the full load-time taxonomy
//! - Integration with `thiserror` for ergonomic error handling
//!
//! # Design Principles
//! - All errors implement Send + Sync for async compatibility
//! - Use thiserror for library errors, anyhow at binary boundaries
//! - Provide clear, actionable error messages
//! - Surface every problem at load time; there is no local recovery once the
//!   document has been rejected

use thiserror::Error;

/// Base trait for all recon-config errors
///
/// This trait ensures all errors are:
/// - Thread-safe (Send + Sync)
/// - Static lifetime (no borrowed data)
/// - Implement standard Error trait
pub trait ReconError: std::error::Error + Send + Sync + 'static {}

/// Configuration-related errors
///
/// These errors occur during configuration loading, parsing, or validation.
/// The document is the sole source of these values, so none of them are
/// recoverable by the loader itself.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration file cannot be read
    #[error("Cannot read configuration file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Document is not well-formed YAML
    #[error("Malformed configuration document: {details}")]
    MalformedDocument { details: String },

    /// Required key absent from the document
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Value does not match the expected semantic type
    #[error("Type mismatch for {field}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Value is not one of the allowed enum variants
    #[error("Invalid value for {field}: {value} (allowed: {allowed})")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: String,
    },

    /// Numeric value outside its documented bounds
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    RangeViolation {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Semantically invalid value that is not a range problem
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Environment variable error
    #[error("Environment variable error for {var}: {details}")]
    EnvironmentError { var: String, details: String },

    /// Re-serialization failed
    #[error("Failed to serialize configuration: {details}")]
    SerializeError { details: String },
}

impl ReconError for ConfigurationError {}

impl ConfigurationError {
    /// Create a range violation for a value constrained to the unit interval
    pub fn unit_range(field: impl Into<String>, value: f64) -> Self {
        Self::RangeViolation {
            field: field.into(),
            value: value.to_string(),
            min: "0".to_string(),
            max: "1".to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigurationError>;
