//! Configuration for the chat pipeline.

use rmp_embeddings::DEFAULT_EMBEDDING_MODEL;
use serde::{Deserialize, Serialize};

use crate::prompt::SYSTEM_PROMPT;

/// Chat model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Model and prompt settings for a [`crate::ChatPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model that generates the answer.
    pub chat_model: String,

    /// Model that embeds the query.
    pub embedding_model: String,

    /// Instructions sent as the system message.
    pub system_prompt: String,
}

impl ChatConfig {
    /// Set the chat model.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}
