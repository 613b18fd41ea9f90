//! Error types for the chat pipeline.

use rmp_embeddings::EmbeddingError;
use rmp_retrieval::RetrievalError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Why a chat request failed.
///
/// Everything except [`ChatError::Generation`] can only happen before the
/// first byte is streamed. Generation failures may also arrive mid-stream, in
/// which case they terminate the relay.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request carried no messages.
    #[error("conversation must contain at least one message")]
    EmptyConversation,

    /// The query could not be embedded.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The vector index could not be queried.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// The language model failed before or during streaming.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Errors raised by a [`crate::Generator`].
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Generator not configured (missing API key).
    #[error("generator not configured")]
    NotConfigured,

    /// API request returned a non-success status.
    #[error("API request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// The provider reported an error inside the stream.
    #[error("provider error: {0}")]
    Provider(String),

    /// A stream event could not be decoded.
    #[error("invalid stream event: {0}")]
    InvalidEvent(String),

    /// The event stream broke while reading.
    #[error("stream interrupted: {0}")]
    Stream(String),

    /// The stream ended without the provider's completion marker.
    #[error("stream ended before completion")]
    Truncated,

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
