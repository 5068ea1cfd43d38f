use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadRagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, ThreadRagError>;
