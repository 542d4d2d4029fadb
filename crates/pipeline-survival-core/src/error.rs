//! Core error types for pipeline-survival-core.
//!
//! This module defines the error hierarchy using thiserror. Each concern
//! (estimation, ingestion, statistics, configuration) has its own enum and
//! [`CoreError`] wraps them for callers that touch more than one.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pipeline-survival-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Survival estimation errors
    #[error("Survival error: {0}")]
    Survival(#[from] SurvivalError),

    /// Input parsing errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Descriptive statistics and forecasting errors
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Why a single record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReason {
    #[error("duration {0} is negative")]
    NegativeDuration(f64),

    #[error("duration is not a finite number")]
    NonFiniteDuration,

    #[error("unrecognized event flag '{0}'")]
    UnrecognizedEventFlag(String),
}

/// Survival estimation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurvivalError {
    /// No records were supplied
    #[error("no records supplied; a survival curve needs at least one record")]
    EmptyInput,

    /// A record failed validation; the whole computation is rejected
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: InvalidReason },

    /// Confidence level outside the open interval (0, 1)
    #[error("confidence level must be between 0 and 1 (exclusive), got {0}")]
    InvalidConfidenceLevel(f64),
}

/// Input parsing errors.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Header row is missing or does not carry the expected columns
    #[error("missing or unexpected header: expected '{expected}'")]
    MissingHeader { expected: String },

    /// Row has the wrong number of columns
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Cell could not be parsed as a number
    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber { line: usize, value: String },

    /// Cell could not be parsed as a date
    #[error("line {line}: '{value}' is not a date (expected M/D/YYYY or YYYY-MM-DD)")]
    InvalidDate { line: usize, value: String },

    /// Requested product is not present in the deal-value file
    #[error("unknown product '{product}' (available: {available})")]
    UnknownProduct { product: String, available: String },

    /// Failed to read input
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deal-value JSON is malformed
    #[error("invalid deal value JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Descriptive statistics and forecasting errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// No values to summarize
    #[error("no values supplied")]
    Empty,

    /// Parameter out of range
    #[error("invalid value for '{field}': {message}")]
    InvalidParameter { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not create the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    NoDataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SurvivalError {
    pub(crate) fn invalid(index: usize, reason: InvalidReason) -> Self {
        SurvivalError::InvalidRecord { index, reason }
    }
}

impl StatsError {
    pub(crate) fn parameter(field: &str, message: impl Into<String>) -> Self {
        StatsError::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
