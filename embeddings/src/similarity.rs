//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;

use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0. A zero-magnitude vector has
/// similarity 0.0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// A similarity search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// Position of the matched candidate in the input slice.
    pub position: usize,

    /// Similarity score.
    pub score: f32,
}

/// Find the `k` candidates most similar to `query`, best first.
///
/// Candidates with equal scores keep their input order.
pub fn find_top_k(query: &[f32], candidates: &[&[f32]], k: usize) -> Result<Vec<SimilarityResult>> {
    let mut scores: Vec<(OrderedFloat<f32>, usize)> = Vec::with_capacity(candidates.len());

    for (position, embedding) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, embedding)?;
        scores.push((OrderedFloat(score), position));
    }

    // Stable sort keeps insertion order among ties.
    scores.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scores
        .into_iter()
        .take(k)
        .map(|(score, position)| SimilarityResult {
            position,
            score: score.0,
        })
        .collect())
}
