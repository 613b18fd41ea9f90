//! Records returned by a vector query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named attributes attached to an indexed record (`subject`, `stars`, `review`, ...).
pub type Metadata = serde_json::Map<String, Value>;

/// One nearest-neighbour match, in the rank order the index reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    /// Record identifier (the professor's name).
    pub id: String,

    /// Similarity score as reported by the index.
    #[serde(default)]
    pub score: f32,

    /// Attributes stored alongside the vector.
    #[serde(default)]
    pub metadata: Metadata,
}

impl RetrievedRecord {
    /// Create a record without metadata.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata attribute.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Render a metadata attribute as display text.
    ///
    /// Strings are returned without quotes, numbers in their shortest form.
    /// Missing or null attributes yield `None`.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
