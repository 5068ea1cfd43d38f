//! Embedding backends for the vector index
//!
//! - OpenAI-compatible `/embeddings` (text-embedding-3-small by default)
//! - Ollama local models
//! - A deterministic hashing embedder used when no API key is configured
//!
//! # Examples
//!
//! ```rust,no_run
//! use threadrag::config::AppConfig;
//! use threadrag::embeddings::build_embedder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let embedder = build_embedder(&config.embeddings, config.llm.timeout_secs)?;
//!
//!     let vectors = embedder.embed_batch(&["Hello, world!"]).await?;
//!     println!("Generated embedding with {} dimensions", vectors[0].len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod hashing;
pub mod text_preprocessing;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

pub use client::EmbeddingClient;
pub use hashing::HashEmbedder;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::config::EmbeddingsConfig;
use crate::errors::Result;
use crate::errors::ThreadRagError;

/// Maximum batch size for a single embedding request
pub const MAX_BATCH_SIZE: usize = 100;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API (or any compatible endpoint)
    OpenAI,
    /// Ollama local embeddings
    Ollama,
    /// Local feature hashing, no network
    Hashing,
}

/// Turns texts into dense vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed texts, one vector per input in input order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ThreadRagError::EmbeddingError("No embedding returned".to_string()))
    }
}

/// Build the embedder selected by configuration
pub fn build_embedder(config: &EmbeddingsConfig, timeout_secs: u64) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.resolved_provider() {
        EmbeddingProvider::Hashing => Arc::new(HashEmbedder::new(config.dimension)?),
        provider => Arc::new(EmbeddingClient::new(
            provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
            timeout_secs,
        )?),
    };
    Ok(embedder)
}
