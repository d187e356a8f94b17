//! Core error types for cyclewatch-core.
//!
//! This module defines the error hierarchy using thiserror. Data-shape
//! anomalies in the event stream are modeled as data (`Situation::Unknown`,
//! `StatusChange::Unknown`), not as errors; the variants below cover
//! programming-contract violations and infrastructure failures only.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cyclewatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event-store retrieval errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Event-document decode errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Event-store errors: transport failures and unexpected search responses.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A configured host is not a valid URL
    #[error("Invalid store host '{host}': {message}")]
    InvalidHost { host: String, message: String },

    /// No hosts configured at all
    #[error("No store hosts configured")]
    NoHosts,

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status from the search endpoint
    #[error("Search on index '{index}' returned status {status}")]
    Status { index: String, status: u16 },

    /// Response body did not have the expected search-result shape
    #[error("Unexpected search response: {0}")]
    UnexpectedResponse(String),
}

/// Event-document decode errors raised by source adapters.
#[derive(Error, Debug)]
pub enum SourceError {
    /// A required field is absent from the document
    #[error("Missing field '{field}' in event document")]
    MissingField { field: String },

    /// A field is present but cannot be decoded
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl SourceError {
    pub fn missing(field: &str) -> Self {
        SourceError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        SourceError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not determine the configuration directory
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Validation errors for programming-contract violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid date range
    #[error("Invalid date range: end_date ({end}) must be greater than start_date ({start})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
