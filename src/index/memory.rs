//! Exact in-memory vector index
//!
//! Nothing is persisted; the collection lives as long as the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use super::DistanceMetric;
use super::VectorIndex;
use crate::embeddings::Embedder;
use crate::embeddings::MAX_BATCH_SIZE;
use crate::errors::Result;
use crate::errors::ThreadRagError;
use crate::models::Chunk;
use crate::models::Metadata;
use crate::models::Neighbor;

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    text: String,
    embedding: Vec<f32>,
    metadata: Metadata,
}

/// Brute-force nearest-neighbor search over embedded chunks
pub struct InMemoryIndex {
    name: String,
    metric: DistanceMetric,
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryIndex {
    pub fn new(name: impl Into<String>, metric: DistanceMetric, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            name: name.into(),
            metric,
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Ids of stored chunks in insertion order
    #[cfg(test)]
    async fn ids(&self) -> Vec<String> {
        self.entries.read().await.iter().map(|e| e.id.clone()).collect()
    }

    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(MAX_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts).await.map_err(|e| {
                ThreadRagError::IndexError(format!("Embedding backend failed: {e}"))
            })?;
            if vectors.len() != texts.len() {
                return Err(ThreadRagError::IndexError(format!(
                    "Embedding backend returned {} vectors for {} chunks",
                    vectors.len(),
                    texts.len()
                )));
            }
            embeddings.extend(vectors);
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn index(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        if let Some(pos) = chunks.iter().position(|c| c.text.trim().is_empty()) {
            return Err(ThreadRagError::IndexError(format!(
                "Chunk {pos} has empty text"
            )));
        }

        let embeddings = self.embed_chunks(chunks).await?;

        let mut entries = self.entries.write().await;
        let dimension = entries
            .first()
            .map_or_else(|| embeddings[0].len(), |e| e.embedding.len());
        if let Some(bad) = embeddings.iter().find(|v| v.len() != dimension) {
            return Err(ThreadRagError::IndexError(format!(
                "Embedding dimension mismatch: expected {dimension}, got {}",
                bad.len()
            )));
        }

        let offset = entries.len();
        entries.extend(chunks.iter().zip(embeddings).enumerate().map(
            |(i, (chunk, embedding))| {
                let mut metadata = Metadata::new();
                metadata.insert("tokens".to_string(), chunk.token_estimate.into());
                Entry {
                    id: format!("c{}", offset + i),
                    text: chunk.text.clone(),
                    embedding,
                    metadata,
                }
            },
        ));

        info!(
            "Indexed {} chunks into '{}' ({} total)",
            chunks.len(),
            self.name,
            entries.len()
        );
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 || self.entries.read().await.is_empty() {
            return Ok(Vec::new());
        }

        // No lock held while embedding
        let query_embedding = self.embedder.embed(text).await.map_err(|e| {
            ThreadRagError::IndexError(format!("Failed to embed query: {e}"))
        })?;

        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &Entry)> = entries
            .iter()
            .map(|entry| (self.metric.distance(&query_embedding, &entry.embedding), entry))
            .collect();
        // Stable: equal distances keep insertion order
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        debug!(
            "Query against '{}' scored {} entries, returning {}",
            self.name,
            scored.len(),
            k.min(scored.len())
        );

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, entry)| Neighbor {
                text: entry.text.clone(),
                distance,
                metadata: entry.metadata.clone(),
            })
            .collect())
    }

    async fn reset(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        if !entries.is_empty() {
            debug!("Dropping {} entries from '{}'", entries.len(), self.name);
        }
        entries.clear();
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
