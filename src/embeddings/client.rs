//! Embedding API clients for remote providers

use async_trait::async_trait;
use futures::stream::StreamExt;
use futures::stream::{
    self,
};
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::preprocess_text_for_embedding;
use super::Embedder;
use super::EmbeddingProvider;
use super::MAX_BATCH_SIZE;
use crate::errors::Result;
use crate::errors::ThreadRagError;

/// Concurrent single-text requests against Ollama
const OLLAMA_CONCURRENCY: usize = 8;

/// Client for generating embeddings from an HTTP provider
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - `Hashing` is not an HTTP provider
    /// - HTTP client build errors
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        if provider == EmbeddingProvider::Hashing {
            return Err(ThreadRagError::ConfigError(
                "Hashing embeddings do not use an HTTP client".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ThreadRagError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ThreadRagError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIBatchRequest<'a> {
            input: &'a [String],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI batch embeddings API: {} items", texts.len());

        let request = OpenAIBatchRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ThreadRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ThreadRagError::EmbeddingError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let mut result: OpenAIResponse = response.json().await.map_err(|e| {
            ThreadRagError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        if result.data.len() != texts.len() {
            return Err(ThreadRagError::EmbeddingError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ThreadRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ThreadRagError::EmbeddingError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            ThreadRagError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let processed = texts
            .iter()
            .map(|text| preprocess_text_for_embedding(text))
            .collect::<Result<Vec<String>>>()?;

        match self.provider {
            EmbeddingProvider::OpenAI => {
                let mut embeddings = Vec::with_capacity(processed.len());
                for batch in processed.chunks(MAX_BATCH_SIZE) {
                    embeddings.extend(self.generate_batch_openai(batch).await?);
                }
                Ok(embeddings)
            }
            EmbeddingProvider::Ollama => {
                // Ollama has no batch endpoint; keep order with `buffered`
                let results: Vec<Result<Vec<f32>>> = stream::iter(processed)
                    .map(|text| async move { self.generate_ollama(&text).await })
                    .buffered(OLLAMA_CONCURRENCY)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
            EmbeddingProvider::Hashing => Err(ThreadRagError::ConfigError(
                "Hashing embeddings do not use an HTTP client".to_string(),
            )),
        }
    }
}
