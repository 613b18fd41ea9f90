//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while producing an embedding.
///
/// Every variant is fatal for the request that triggered it: callers never
/// substitute a default vector.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Provider not configured (missing API key).
    #[error("embedding provider not configured")]
    ProviderNotConfigured,

    /// Input text was empty or whitespace.
    #[error("cannot embed empty text")]
    EmptyInput,

    /// API request returned a non-success status.
    #[error("API request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
