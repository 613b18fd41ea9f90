//! # Retrieval
//!
//! Finds the professor reviews closest to a query vector.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Retrieval                           │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │   query vector ──► VectorRetriever ──► Vec<RetrievedRecord> │
//! │                          │                                 │
//! │                          ▼                                 │
//! │                    dyn VectorIndex                         │
//! │                    ┌─────┴──────┐                          │
//! │              PineconeIndex  InMemoryIndex                  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rmp_retrieval::{PineconeConfig, PineconeIndex, VectorRetriever};
//!
//! let config = PineconeConfig::default().with_api_key(api_key);
//! let index = PineconeIndex::connect(config).await?;
//! let retriever = VectorRetriever::new(Arc::new(index));
//! let records = retriever.retrieve(&vector).await?;
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod memory;
pub mod pinecone;
pub mod record;
pub mod retriever;

pub use config::{DEFAULT_INDEX_NAME, DEFAULT_NAMESPACE, DEFAULT_TOP_K, PineconeConfig, RetrievalConfig};
pub use error::{Result, RetrievalError};
pub use index::VectorIndex;
pub use memory::InMemoryIndex;
pub use pinecone::PineconeIndex;
pub use record::{Metadata, RetrievedRecord};
pub use retriever::VectorRetriever;
