//! Language-model access for reranking and answer synthesis
//!
//! The pipeline only talks to [`LlmClient`]. [`OpenAiCompatClient`] speaks the
//! OpenAI chat-completions protocol, which OpenRouter and most local servers
//! accept as well.

pub mod client;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

pub use client::OpenAiCompatClient;
pub use prompts::PromptTemplate;
pub use prompts::RagPrompts;

use crate::config::LlmConfig;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Single user turn
    pub fn prompt(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        }
    }
}

/// Synchronous request/response completion, raw text out
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// The configured client, or `None` when no API key is available
pub fn build_llm_client(config: &LlmConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            let client: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::new(config)?);
            Ok(Some(client))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_means_no_client() {
        assert!(build_llm_client(&LlmConfig::default()).unwrap().is_none());

        let blank = LlmConfig {
            api_key: Some(String::new()),
            ..LlmConfig::default()
        };
        assert!(build_llm_client(&blank).unwrap().is_none());
    }

    #[test]
    fn test_key_builds_client() {
        let config = LlmConfig {
            api_key: Some("sk-or-test".to_string()),
            ..LlmConfig::default()
        };
        assert!(build_llm_client(&config).unwrap().is_some());
    }

    #[test]
    fn test_prompt_request() {
        let request = CompletionRequest::prompt("rank these", 0.0, 100);
        assert_eq!(request.messages, vec![ChatMessage::user("rank these")]);
        assert_eq!(request.max_tokens, 100);
    }
}
