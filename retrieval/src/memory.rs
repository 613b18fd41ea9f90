//! In-process vector index for offline development and tests.

use async_trait::async_trait;
use rmp_embeddings::{Embedding, find_top_k};
use tracing::debug;

use crate::error::{Result, RetrievalError};
use crate::index::VectorIndex;
use crate::record::{Metadata, RetrievedRecord};

/// An entry in the in-memory index.
#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    embedding: Embedding,
    metadata: Metadata,
}

/// A brute-force cosine-similarity index.
///
/// Entries keep insertion order, which also breaks score ties.
pub struct InMemoryIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
}

impl InMemoryIndex {
    /// Create an empty index for vectors of `dimension` elements.
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: Vec::new(),
            dimension,
        }
    }

    /// Insert a record, replacing any existing record with the same id in place.
    pub fn upsert(
        &mut self,
        id: impl Into<String>,
        embedding: Embedding,
        metadata: Metadata,
    ) -> Result<()> {
        let id = id.into();

        if embedding.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let entry = IndexEntry {
            id,
            embedding,
            metadata,
        };

        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }

        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedRecord>> {
        if vector.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let candidates: Vec<&[f32]> = self.entries.iter().map(|e| e.embedding.as_slice()).collect();
        let ranked = find_top_k(vector, &candidates, top_k)
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        let records: Vec<RetrievedRecord> = ranked
            .into_iter()
            .filter_map(|hit| {
                self.entries.get(hit.position).map(|entry| RetrievedRecord {
                    id: entry.id.clone(),
                    score: hit.score,
                    metadata: entry.metadata.clone(),
                })
            })
            .collect();

        debug!("In-memory query matched {} of {} records", records.len(), self.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn metadata(subject: &str) -> Metadata {
        let mut map = Metadata::new();
        map.insert("subject".to_string(), json!(subject));
        map
    }

    #[tokio::test]
    async fn test_query_orders_by_similarity() {
        let mut index = InMemoryIndex::new(3);
        index.upsert("a", vec![1.0, 0.0, 0.0], metadata("Math")).unwrap();
        index.upsert("b", vec![0.0, 1.0, 0.0], metadata("Physics")).unwrap();
        index.upsert("c", vec![0.7, 0.7, 0.0], metadata("Chemistry")).unwrap();

        let records = index.query(&[1.0, 0.0, 0.0], 2).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(records[0].field_text("subject").as_deref(), Some("Math"));
    }

    #[tokio::test]
    async fn test_query_returns_fewer_than_k() {
        let mut index = InMemoryIndex::new(2);
        index.upsert("only", vec![1.0, 0.0], Metadata::new()).unwrap();

        let records = index.query(&[1.0, 0.0], 3).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let index = InMemoryIndex::new(3);
        let result = index.query(&[1.0, 0.0], 3).await;
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut index = InMemoryIndex::new(2);
        index.upsert("a", vec![1.0, 0.0], Metadata::new()).unwrap();
        index.upsert("b", vec![0.0, 1.0], Metadata::new()).unwrap();
        index.upsert("a", vec![0.5, 0.5], metadata("Updated")).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.entries[0].id, "a");
        assert_eq!(index.entries[0].embedding, vec![0.5, 0.5]);
    }

    #[test]
    fn test_upsert_rejects_wrong_dimension() {
        let mut index = InMemoryIndex::new(3);
        assert!(index.upsert("bad", vec![1.0], Metadata::new()).is_err());
        assert!(index.is_empty());
    }
}
