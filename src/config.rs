use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::embeddings::EmbeddingProvider;
use crate::index::DistanceMetric;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,
    /// Sentences carried from the end of one chunk into the next
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

const fn default_max_tokens() -> usize {
    512
}

const fn default_min_tokens() -> usize {
    100
}

const fn default_overlap() -> usize {
    2
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            min_tokens: default_min_tokens(),
            overlap: default_overlap(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Hybrid search breadth
    #[serde(default = "default_k")]
    pub k: usize,
    /// Final reranked count
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Weight of vector similarity in the hybrid score
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Candidates shown to the ranking model
    #[serde(default = "default_rerank_window")]
    pub rerank_window: usize,
    /// Characters of each candidate shown to the ranking model
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

const fn default_k() -> usize {
    20
}

const fn default_top_k() -> usize {
    5
}

const fn default_alpha() -> f32 {
    0.7
}

const fn default_rerank_window() -> usize {
    20
}

const fn default_preview_chars() -> usize {
    300
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            top_k: default_top_k(),
            alpha: default_alpha(),
            rerank_window: default_rerank_window(),
            preview_chars: default_preview_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// Reranking and synthesis are disabled without a key
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_rerank_max_tokens")]
    pub rerank_max_tokens: u32,
    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_llm_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

const fn default_rerank_max_tokens() -> u32 {
    100
}

const fn default_answer_max_tokens() -> u32 {
    800
}

const fn default_temperature() -> f32 {
    0.2
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_llm_model(),
            rerank_max_tokens: default_rerank_max_tokens(),
            answer_max_tokens: default_answer_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Selected automatically from the available credentials when unset
    #[serde(default)]
    pub provider: Option<EmbeddingProvider>,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Only used by the local hashing embedder
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: None,
            endpoint: default_embedding_endpoint(),
            api_key: None,
            model: default_embedding_model(),
            dimension: default_dimension(),
        }
    }
}

impl EmbeddingsConfig {
    /// Explicit provider, else OpenAI when a key is present, else local hashing
    pub fn resolved_provider(&self) -> EmbeddingProvider {
        match self.provider {
            Some(provider) => provider,
            None if self.api_key.is_some() => EmbeddingProvider::OpenAI,
            None => EmbeddingProvider::Hashing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_name")]
    pub name: String,
    #[serde(default)]
    pub distance: DistanceMetric,
}

fn default_index_name() -> String {
    "threadrag".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            distance: DistanceMetric::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `threadrag.toml`, then `threadrag.example.toml`, else defaults.
    /// Environment overrides are applied and the result validated.
    pub fn load() -> crate::Result<Self> {
        let config = if Path::new("threadrag.toml").exists() {
            Self::from_file("threadrag.toml")?
        } else if Path::new("threadrag.example.toml").exists() {
            warn!("Using threadrag.example.toml. Create threadrag.toml for real use.");
            Self::from_file("threadrag.example.toml")?
        } else {
            Self::default()
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file, then apply environment overrides and validate
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let config = Self::from_file(path)?.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// API keys and log level from the environment win over the file
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.embeddings.api_key = Some(key);
            }
        }
        if let Ok(level) = std::env::var("THREADRAG_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.chunking.max_tokens == 0 {
            return Err(crate::ThreadRagError::ConfigError(
                "chunking.max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retrieval.alpha) {
            return Err(crate::ThreadRagError::ConfigError(format!(
                "retrieval.alpha must be within [0, 1], got {}",
                self.retrieval.alpha
            )));
        }
        if self.retrieval.k == 0 || self.retrieval.top_k == 0 {
            return Err(crate::ThreadRagError::ConfigError(
                "retrieval.k and retrieval.top_k must be greater than 0".to_string(),
            ));
        }
        for (name, endpoint) in [
            ("llm.endpoint", &self.llm.endpoint),
            ("embeddings.endpoint", &self.embeddings.endpoint),
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                crate::ThreadRagError::ConfigError(format!("{name} is not a valid URL: {e}"))
            })?;
        }
        Ok(())
    }

    /// Whether a ranking/synthesis model can be reached
    pub fn llm_enabled(&self) -> bool {
        self.llm.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
