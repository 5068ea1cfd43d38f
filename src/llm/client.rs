//! OpenAI-compatible chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::CompletionRequest;
use super::LlmClient;
use crate::config::LlmConfig;
use crate::errors::Result;
use crate::errors::ThreadRagError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat client for OpenRouter, OpenAI and compatible servers
pub struct OpenAiCompatClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiCompatClient {
    /// The request timeout comes from `llm.timeout_secs`; the client enforces it
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ThreadRagError::ConfigError("LLM API key not provided".to_string()))?;

        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ThreadRagError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(
            "Calling chat completions: model={}, max_tokens={}",
            self.model, request.max_tokens
        );

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ThreadRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ThreadRagError::LlmError(format!(
                "Chat completion error ({status}): {error_text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ThreadRagError::LlmError(format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ThreadRagError::LlmError("No content in response".to_string()))
    }
}
