//! Error types for the salesrep-core library.

use thiserror::Error;

/// Main error type for the salesrep library.
#[derive(Error, Debug)]
pub enum SalesError {
    /// Sales figure extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to sales figure extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to parse a value.
    #[error("failed to parse {field}: {value:?}")]
    Parse { field: String, value: String },

    /// A mandatory label could not be found anywhere on the page.
    #[error("label not found: {label}")]
    MissingLabel { label: String },

    /// A label was found but no number followed it within the scan window.
    #[error("no number within {window} lines after label: {label}")]
    NumberNotFound { label: String, window: usize },

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The embedded data object was found but could not be parsed.
    #[error("inline data could not be parsed: {0}")]
    InlineData(String),
}

impl ExtractionError {
    pub(crate) fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for the salesrep library.
pub type Result<T> = std::result::Result<T, SalesError>;
