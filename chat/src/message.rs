//! Conversation data model.

use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Chronologically ordered messages; the last one is the turn to answer.
///
/// Serialized as a bare JSON array of `{role, content}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The message being answered.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Every message before the last one.
    pub fn history(&self) -> &[Message] {
        match self.messages.split_last() {
            Some((_, history)) => history,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_json_array() {
        let conversation: Conversation = serde_json::from_str(
            r#"[{"role": "assistant", "content": "Hi!"}, {"role": "user", "content": "Who teaches calculus?"}]"#,
        )
        .unwrap();

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0], Message::assistant("Hi!"));
        assert_eq!(conversation.last(), Some(&Message::user("Who teaches calculus?")));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Conversation, _> =
            serde_json::from_str(r#"[{"role": "tool", "content": "x"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_excludes_last() {
        let conversation = Conversation::from(vec![
            Message::user("first"),
            Message::assistant("second"),
            Message::user("third"),
        ]);
        assert_eq!(
            conversation.history(),
            &[Message::user("first"), Message::assistant("second")]
        );
    }

    #[test]
    fn test_empty_conversation() {
        let conversation = Conversation::default();
        assert!(conversation.is_empty());
        assert!(conversation.last().is_none());
        assert!(conversation.history().is_empty());
    }
}
