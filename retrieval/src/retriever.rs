//! Top-k retrieval over an injected vector index.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{DEFAULT_TOP_K, RetrievalConfig};
use crate::error::{Result, RetrievalError};
use crate::index::VectorIndex;
use crate::record::RetrievedRecord;

/// Fetches the `top_k` records nearest to a query vector.
///
/// Failures are returned to the caller untouched; the retriever never
/// substitutes an empty or made-up result.
#[derive(Clone)]
pub struct VectorRetriever {
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl VectorRetriever {
    /// Create a retriever returning [`DEFAULT_TOP_K`] records.
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Create a retriever from configuration.
    pub fn from_config(index: Arc<dyn VectorIndex>, config: &RetrievalConfig) -> Self {
        Self::new(index).with_top_k(config.top_k)
    }

    /// Set the number of records returned. Values below one are raised to one.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Number of records requested per query.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Query the index, preserving the rank order it reports.
    pub async fn retrieve(&self, vector: &[f32]) -> Result<Vec<RetrievedRecord>> {
        if let Some(expected) = self.index.dimension() {
            if expected != vector.len() {
                return Err(RetrievalError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        let mut records = self.index.query(vector, self.top_k).await?;

        if records.len() > self.top_k {
            warn!(
                "Index {} returned {} records for top_k {}; truncating",
                self.index.name(),
                records.len(),
                self.top_k
            );
            records.truncate(self.top_k);
        }

        info!(
            "Retrieved {} of {} requested records from {}",
            records.len(),
            self.top_k,
            self.index.name()
        );

        Ok(records)
    }
}
