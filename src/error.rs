//! Error types for the flight schedule tool

use thiserror::Error;

/// Result type for flight schedule operations
pub type Result<T> = std::result::Result<T, FlightError>;

/// File- and format-level errors.
///
/// Per-line validation problems are not errors: they become
/// diagnostics and ingestion carries on.
#[derive(Error, Debug)]
pub enum FlightError {
    #[error("Invalid record storage format: {0}")]
    StorageFormat(String),

    #[error("Invalid query format: {0}")]
    QueryFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
