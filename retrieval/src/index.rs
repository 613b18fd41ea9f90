//! The nearest-neighbour index seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::RetrievedRecord;

/// A vector index that answers top-k similarity queries.
///
/// Implementations return matches ordered by descending similarity and may
/// return fewer than `top_k` records.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Get the name of this index backend.
    fn name(&self) -> &str;

    /// Dimension of the stored vectors, when the backend knows it.
    fn dimension(&self) -> Option<usize>;

    /// Return up to `top_k` records nearest to `vector`.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedRecord>>;
}
