//! Error types for the fintab-core library.

use thiserror::Error;

/// Main error type for the fintab library.
#[derive(Error, Debug)]
pub enum FintabError {
    /// Table or line extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while turning document text into records.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The header line of a region produced no column names.
    #[error("no column names found in header line {line}")]
    EmptyHeader { line: usize },

    /// A region handed to the mapper is unusable.
    #[error("invalid table region: {0}")]
    InvalidRegion(String),

    /// Comma-separated parsing failed part way through.
    #[error("delimited text parse failed: {0}")]
    Delimited(#[from] csv::Error),
}

/// Errors related to configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is out of its allowed range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Result type for the fintab library.
pub type Result<T> = std::result::Result<T, FintabError>;
