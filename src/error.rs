//! Error types for studoro.

use thiserror::Error;

/// Errors that can occur across the studoro crate.
#[derive(Debug, Error)]
pub enum StudoroError {
    /// Configuration problem (missing home, bad config file, invalid input).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation was rejected without changing state.
    #[error("{0}")]
    Validation(String),

    /// JSON serialization/deserialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
