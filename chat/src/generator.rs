//! The language-model seam.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::GenerationError;
use crate::message::Message;

/// One incremental event from a generator.
///
/// Providers emit events that carry no text (role announcements, finish
/// markers); those have `content: None` or an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationChunk {
    pub content: Option<String>,
}

impl GenerationChunk {
    /// A chunk carrying a text fragment.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// A chunk with no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The text fragment, if present and non-empty.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

/// Lazily consumed stream of generator events. Dropping it cancels generation.
pub type ChunkStream = BoxStream<'static, Result<GenerationChunk, GenerationError>>;

/// A streaming text generator.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Get the name of this generator.
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Submit `messages` and return the incremental response.
    ///
    /// An `Err` here means nothing was streamed. Failures after this returns
    /// arrive as `Err` items on the stream.
    async fn generate(&self, messages: &[Message]) -> Result<ChunkStream, GenerationError>;
}
