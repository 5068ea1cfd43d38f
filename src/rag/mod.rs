//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end question answering over an ingested corpus:
//! - Hybrid retrieval from the vector index
//! - Listwise LLM reranking with pass-through fallback
//! - Context assembly from the reranked snippets
//! - LLM-based answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use threadrag::config::AppConfig;
//! use threadrag::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config, "threadrag_espresso")?;
//!
//!     service.ingest("Grind finer when shots run fast. Dial in one variable at a time.").await?;
//!     let response = service.answer("How do I fix sour espresso?").await?;
//!     println!("Answer: {}", response.answer);
//!     println!("Sources: {} snippets", response.sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod reranker;

pub use context::ContextAssembler;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use pipeline::RetrievalTrace;
pub use reranker::FallbackReason;
pub use reranker::RerankOutcome;
pub use reranker::Reranker;
