//! Hybrid retrieval: vector similarity blended with lexical overlap
//!
//! The index is over-fetched (`2k`) so the lexical signal has room to pull
//! candidates up, then everything is re-sorted by
//! `alpha * similarity + (1 - alpha) * lexical` and cut to `k`.

use tracing::debug;

use super::lexical::lexical_score;
use crate::errors::Result;
use crate::index::VectorIndex;
use crate::models::Candidate;
use crate::models::Neighbor;

/// Weight of vector similarity when none is configured
pub const DEFAULT_ALPHA: f32 = 0.7;

/// Neighbors requested from the index per result kept
const OVERFETCH_FACTOR: usize = 2;

pub fn hybrid_score(alpha: f32, similarity_score: f32, lexical_score: f32) -> f32 {
    alpha * similarity_score + (1.0 - alpha) * lexical_score
}

/// Query the index and rank by hybrid score.
///
/// Index failures propagate; an undersized or empty result set does not.
pub async fn hybrid_search(
    index: &dyn VectorIndex,
    query: &str,
    k: usize,
    alpha: f32,
) -> Result<Vec<Candidate>> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let neighbors = index.query(query, k * OVERFETCH_FACTOR).await?;
    debug!(
        "Hybrid search fetched {} neighbors for k={} (alpha={})",
        neighbors.len(),
        k,
        alpha
    );

    Ok(rank_neighbors(neighbors, query, k, alpha))
}

/// Score neighbors against the query and keep the top `k`.
/// Ties keep the index's order.
pub fn rank_neighbors(neighbors: Vec<Neighbor>, query: &str, k: usize, alpha: f32) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = neighbors
        .into_iter()
        .map(|neighbor| {
            let similarity_score = neighbor.similarity();
            let lexical = lexical_score(&neighbor.text, query);
            Candidate {
                hybrid_score: hybrid_score(alpha, similarity_score, lexical),
                similarity_score,
                lexical_score: lexical,
                text: neighbor.text,
                metadata: neighbor.metadata,
            }
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| b.hybrid_score.total_cmp(&a.hybrid_score));
    candidates.truncate(k);
    candidates
}
