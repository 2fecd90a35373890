//! Error types for the txt-dashboard library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the txt-dashboard application.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors reading the message export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the export header
    #[error("Missing column in message export: {0}")]
    MissingColumn(String),

    /// A timestamp could not be parsed; the whole load is rejected
    #[error("Invalid timestamp on row {row}: {value}")]
    InvalidTimestamp {
        /// 1-based data row number
        row: usize,
        /// The offending timestamp field
        value: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Regular expression construction errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Other(err.to_string())
    }
}
