//! # Chat
//!
//! Single-turn retrieval-augmented chat: the latest user message is embedded,
//! the closest professor reviews are fetched, and the generated answer is
//! streamed back chunk by chunk.
//!
//! ## Pipeline
//!
//! ```text
//! Conversation
//!     │ extract_query
//!     ▼
//! EmbeddingProvider ──► VectorRetriever ──► format_context
//!                                               │
//!                                               ▼
//!                                        PromptAssembler
//!                                               │
//!                                               ▼
//!                                  Generator ──► StreamingRelay ──► bytes
//! ```
//!
//! Every collaborator is injected, and no state is shared between requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use rmp_chat::{ChatPipeline, Conversation, Message};
//!
//! let pipeline = ChatPipeline::new(embedder, retriever, generator);
//! let conversation = Conversation::from(vec![Message::user("who teaches algorithms well?")]);
//! let mut relay = pipeline.submit(&conversation).await?;
//! while let Some(chunk) = relay.next().await {
//!     print!("{}", String::from_utf8_lossy(&chunk?));
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod message;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod query;
pub mod relay;

pub use config::{ChatConfig, DEFAULT_CHAT_MODEL};
pub use context::format_context;
pub use error::{ChatError, GenerationError, Result};
pub use generator::{ChunkStream, GenerationChunk, Generator};
pub use message::{Conversation, Message, Role};
pub use openai::OpenAIChatGenerator;
pub use pipeline::ChatPipeline;
pub use prompt::{PromptAssembler, SYSTEM_PROMPT};
pub use query::extract_query;
pub use relay::{RelayState, StreamingRelay};
