//! Error types for tubepulse

use thiserror::Error;

/// Errors that abort an analysis before aggregation begins.
///
/// Data-quality problems inside a batch never surface here: malformed
/// units are skipped and scoring failures degrade to neutral polarity.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid video identifier: {0}")]
    InvalidVideoId(String),

    #[error("Captions unavailable: {0}")]
    CaptionsUnavailable(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Reasons a single source record is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("missing text")]
    MissingText,

    #[error("blank text")]
    BlankText,

    #[error("missing start offset")]
    MissingStart,

    #[error("invalid start offset: {0}")]
    InvalidStart(f64),

    #[error("invalid duration: {0}")]
    InvalidDuration(f64),

    #[error("unexpected record shape: {0}")]
    UnexpectedShape(String),
}
