//! Listwise LLM reranking with pass-through fallback
//!
//! The model sees the query and a numbered preview of the leading candidates
//! and answers with a JSON array of indices, most relevant first. Every
//! failure (no client, transport error, malformed answer) degrades to the
//! first `k` candidates in their original order. Nothing here returns an
//! error: callers always get a list, and the [`RerankOutcome`] says why it
//! was or was not reordered.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::cli::output::truncate_str;
use crate::config::LlmConfig;
use crate::config::RetrievalConfig;
use crate::errors::Result;
use crate::errors::ThreadRagError;
use crate::llm::CompletionRequest;
use crate::llm::LlmClient;
use crate::llm::RagPrompts;
use crate::models::Candidate;

/// Why the input order was kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No ranking model configured; an expected operating mode
    NoClient,
    /// Nothing to rank
    NoCandidates,
    /// Transport, timeout or provider error
    RequestFailed(String),
    /// The answer was not a JSON integer array
    MalformedResponse(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoClient => write!(f, "no ranking model configured"),
            Self::NoCandidates => write!(f, "no candidates to rank"),
            Self::RequestFailed(e) => write!(f, "ranking request failed: {e}"),
            Self::MalformedResponse(e) => write!(f, "malformed ranking response: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RerankOutcome {
    Reordered(Vec<Candidate>),
    Fallback {
        candidates: Vec<Candidate>,
        reason: FallbackReason,
    },
}

impl RerankOutcome {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Reordered(candidates) | Self::Fallback { candidates, .. } => candidates,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Reordered(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_reordered(&self) -> bool {
        matches!(self, Self::Reordered(_))
    }
}

/// Candidates shown to the model by default
pub const DEFAULT_RERANK_WINDOW: usize = 20;

/// Preview characters per candidate by default
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

/// Token budget for the index array
pub const DEFAULT_RERANK_MAX_TOKENS: u32 = 100;

pub struct Reranker {
    client: Option<Arc<dyn LlmClient>>,
    window: usize,
    preview_chars: usize,
    max_tokens: u32,
}

impl Reranker {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            client,
            window: DEFAULT_RERANK_WINDOW,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_tokens: DEFAULT_RERANK_MAX_TOKENS,
        }
    }

    pub fn from_config(
        client: Option<Arc<dyn LlmClient>>,
        retrieval: &RetrievalConfig,
        llm: &LlmConfig,
    ) -> Self {
        Self {
            client,
            window: retrieval.rerank_window,
            preview_chars: retrieval.preview_chars,
            max_tokens: llm.rerank_max_tokens,
        }
    }

    /// Reorder `candidates` by model judgment, returning at most `k`
    pub async fn rerank(&self, query: &str, candidates: &[Candidate], k: usize) -> RerankOutcome {
        let fallback = |reason: FallbackReason| RerankOutcome::Fallback {
            candidates: candidates.iter().take(k).cloned().collect(),
            reason,
        };

        let Some(client) = &self.client else {
            debug!("No ranking model configured, keeping hybrid order");
            return fallback(FallbackReason::NoClient);
        };
        if candidates.is_empty() {
            return fallback(FallbackReason::NoCandidates);
        }

        let request = CompletionRequest::prompt(
            self.build_prompt(query, candidates),
            0.0,
            self.max_tokens,
        );

        let response = match client.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Reranking request failed, keeping hybrid order: {}", e);
                return fallback(FallbackReason::RequestFailed(e.to_string()));
            }
        };

        match parse_ranking(&response) {
            Ok(indices) => {
                let reordered = select_ranked(candidates, &indices, k);
                debug!(
                    "Model ranked {} indices, kept {} candidates",
                    indices.len(),
                    reordered.len()
                );
                RerankOutcome::Reordered(reordered)
            }
            Err(e) => {
                warn!("Reranking response unusable, keeping hybrid order: {}", e);
                fallback(FallbackReason::MalformedResponse(e.to_string()))
            }
        }
    }

    /// Ranking prompt over the first `window` candidates
    pub fn build_prompt(&self, query: &str, candidates: &[Candidate]) -> String {
        let listing = candidates
            .iter()
            .take(self.window)
            .enumerate()
            .map(|(i, c)| {
                let preview: String = c.text.chars().take(self.preview_chars).collect();
                format!("[{i}] {preview}...")
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let values = HashMap::from([("query", query.to_string()), ("candidates", listing)]);
        RagPrompts::rank().render(&values)
    }
}

/// Remove a surrounding ``` fence and an optional language tag line
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = rest.split("```").next().unwrap_or(rest);

    let body = match inner.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => inner.trim_start().strip_prefix("json").unwrap_or(inner),
    };
    body.trim()
}

/// Parse the model's answer as a JSON integer array
pub fn parse_ranking(response: &str) -> Result<Vec<i64>> {
    let cleaned = strip_code_fence(response);
    serde_json::from_str::<Vec<i64>>(cleaned).map_err(|e| {
        ThreadRagError::LlmError(format!(
            "expected JSON integer array, got {:?} ({e})",
            truncate_str(cleaned, 80)
        ))
    })
}

/// The first `k` ranked indices mapped to candidates. Out-of-range and
/// repeated indices are dropped, so each candidate appears at most once.
fn select_ranked(candidates: &[Candidate], indices: &[i64], k: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    indices
        .iter()
        .take(k)
        .filter_map(|&i| usize::try_from(i).ok())
        .filter(|&i| i < candidates.len() && seen.insert(i))
        .map(|i| candidates[i].clone())
        .collect()
}
