//! Search query extraction.

use crate::error::{ChatError, Result};
use crate::message::Conversation;

/// Return the content of the last message, which is what gets searched.
pub fn extract_query(conversation: &Conversation) -> Result<&str> {
    conversation
        .last()
        .map(|message| message.content.as_str())
        .ok_or(ChatError::EmptyConversation)
}
