//! # Embeddings
//!
//! Turns query text into dense vectors for nearest-neighbour search over the
//! professor review index.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Embeddings                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  EmbeddingRequest ──► EmbeddingProvider ──► EmbeddingResponse│
//! │                            │                                │
//! │                            ▼                                │
//! │                     OpenAIProvider        similarity::*     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The provider is injected into the chat pipeline as a trait object so tests
//! can substitute a deterministic fake.

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{cosine_similarity, find_top_k};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of `text-embedding-3-small` vectors.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Embedding model used when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
