//! Custom error types for backoffice-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::fetch::FetchError;

/// The main error type for backoffice-cli operations
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackofficeError {
    /// Create the error raised when an export has nothing to write
    pub fn nothing_to_export() -> Self {
        Self::Export("No rows to export for the selected range".into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BackofficeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backoffice-cli operations
pub type BackofficeResult<T> = Result<T, BackofficeError>;
