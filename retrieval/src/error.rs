//! Error types for vector retrieval.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while querying the vector index.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Index client is missing a required setting.
    #[error("vector index not configured: {0}")]
    NotConfigured(String),

    /// Index returned a non-success status.
    #[error("index request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// Index returned a body we could not interpret.
    #[error("invalid index response: {0}")]
    InvalidResponse(String),

    /// Query vector does not match the index dimension.
    #[error("dimension mismatch: index expects {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
