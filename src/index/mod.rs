//! Vector index capability
//!
//! Retrieval only relies on this narrow interface: store chunks, return
//! neighbors ordered by increasing distance, and drop everything on reset.
//! The bundled [`InMemoryIndex`] does exact brute-force search; any other
//! backend can be plugged in behind the same trait.

pub mod memory;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

pub use memory::InMemoryIndex;

use crate::errors::Result;
use crate::models::Chunk;
use crate::models::Neighbor;

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed and store chunks. Fails with `IndexError` when the embedding
    /// backend is unreachable or the chunk list is malformed.
    async fn index(&self, chunks: &[Chunk]) -> Result<()>;

    /// Up to `k` nearest neighbors of `text`, increasing distance
    async fn query(&self, text: &str, k: usize) -> Result<Vec<Neighbor>>;

    /// Drop all indexed content; idempotent
    async fn reset(&self) -> Result<()>;

    /// Number of stored chunks
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Distance used to order neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)`, in `[0, 2]`
    #[default]
    Cosine,
    /// Squared Euclidean distance
    L2,
    /// `1 - a·b`
    #[serde(rename = "ip")]
    InnerProduct,
}

impl DistanceMetric {
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => {
                let dot = dot(a, b);
                let norm = dot_self(a).sqrt() * dot_self(b).sqrt();
                if norm == 0.0 {
                    1.0
                } else {
                    1.0 - dot / norm
                }
            }
            Self::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
            Self::InnerProduct => 1.0 - dot(a, b),
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn dot_self(a: &[f32]) -> f32 {
    dot(a, a)
}

/// Collection name for a topic: `<prefix>_<topic, lower-cased, spaces as _>`
pub fn collection_name(prefix: &str, topic: &str) -> String {
    format!("{prefix}_{}", topic.trim().replace(' ', "_").to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_distance_range() {
        let metric = DistanceMetric::Cosine;
        assert!(metric.distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((metric.distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((metric.distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_with_zero_vector() {
        assert!((DistanceMetric::Cosine.distance(&[0.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_and_inner_product() {
        assert!((DistanceMetric::L2.distance(&[1.0, 2.0], &[3.0, 2.0]) - 4.0).abs() < 1e-6);
        assert!((DistanceMetric::InnerProduct.distance(&[0.5, 0.5], &[1.0, 1.0])).abs() < 1e-6);
    }

    #[test]
    fn test_metric_serde_names() {
        let metric: DistanceMetric = serde_json::from_str("\"ip\"").unwrap();
        assert_eq!(metric, DistanceMetric::InnerProduct);
        assert_eq!(serde_json::to_string(&DistanceMetric::L2).unwrap(), "\"l2\"");
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(collection_name("reddit", "Home Espresso"), "reddit_home_espresso");
    }
}
