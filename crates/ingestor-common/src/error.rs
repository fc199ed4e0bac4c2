//! Error types shared across the ingestor crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, IngestorError>;

/// Main error type for the shared data model
#[derive(Error, Debug)]
pub enum IngestorError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
