use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Opaque key-value fields passed through from the index
pub type Metadata = HashMap<String, serde_json::Value>;

/// A sentence-aligned span of source text prepared for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sentences joined by single spaces, trimmed
    pub text: String,
    /// `estimate_tokens(text)`; a budgeting heuristic, not a token count
    pub token_estimate: usize,
    /// Number of source sentences, overlap included
    pub sentence_count: usize,
}

/// A nearest-neighbor hit as returned by a [`crate::index::VectorIndex`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub text: String,
    pub distance: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Neighbor {
    /// `1 - distance`, deliberately unclamped
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// A retrieved chunk annotated with per-query relevance scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub similarity_score: f32,
    pub lexical_score: f32,
    pub hybrid_score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}
