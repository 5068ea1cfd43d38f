//! Complete RAG pipeline: Chunk -> Index -> Retrieve -> Rerank -> Generate

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::chunking::Chunker;
use crate::config::AppConfig;
use crate::config::RetrievalConfig;
use crate::embeddings::build_embedder;
use crate::errors::Result;
use crate::errors::ThreadRagError;
use crate::index::InMemoryIndex;
use crate::index::VectorIndex;
use crate::llm::build_llm_client;
use crate::llm::CompletionRequest;
use crate::llm::LlmClient;
use crate::llm::RagPrompts;
use crate::models::Candidate;
use crate::rag::ContextAssembler;
use crate::rag::RerankOutcome;
use crate::rag::Reranker;
use crate::search::hybrid_search;

/// Complete RAG service over one collection
pub struct RagService {
    chunker: Chunker,
    index: Arc<dyn VectorIndex>,
    reranker: Reranker,
    llm: Option<Arc<dyn LlmClient>>,
    context_assembler: ContextAssembler,
    retrieval: RetrievalConfig,
    temperature: f32,
    answer_max_tokens: u32,
}

impl RagService {
    /// Build the configured embedder, an in-memory index named `collection`,
    /// and the language-model client when a key is available.
    ///
    /// # Errors
    /// - Embedding backend configuration errors
    /// - LLM client construction errors
    pub fn new(config: &AppConfig, collection: &str) -> Result<Self> {
        let embedder = build_embedder(&config.embeddings, config.llm.timeout_secs)?;
        let index: Arc<dyn VectorIndex> = Arc::new(InMemoryIndex::new(
            collection,
            config.index.distance,
            embedder,
        ));
        let llm = build_llm_client(&config.llm)?;
        if llm.is_none() {
            info!("No LLM API key configured: reranking passes through, synthesis disabled");
        }

        Ok(Self::from_parts(config, index, llm))
    }

    /// Assemble from existing collaborators
    #[must_use]
    pub fn from_parts(
        config: &AppConfig,
        index: Arc<dyn VectorIndex>,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        Self {
            chunker: Chunker::new(config.chunking),
            index,
            reranker: Reranker::from_config(llm.clone(), &config.retrieval, &config.llm),
            llm,
            context_assembler: ContextAssembler::default(),
            retrieval: config.retrieval,
            temperature: config.llm.temperature,
            answer_max_tokens: config.llm.answer_max_tokens,
        }
    }

    /// Replace the collection contents with the chunks of `text`
    ///
    /// # Errors
    /// - Index errors while resetting or embedding
    pub async fn ingest(&self, text: &str) -> Result<usize> {
        let chunks = self.chunker.chunk(text);
        self.index.reset().await?;

        if chunks.is_empty() {
            info!("No chunks produced, collection left empty");
            return Ok(0);
        }

        self.index.index(&chunks).await?;
        info!("Indexed {} chunks", chunks.len());
        Ok(chunks.len())
    }

    /// Hybrid search followed by reranking, without synthesis
    ///
    /// # Errors
    /// - Index query errors; reranking never fails
    pub async fn retrieve(&self, question: &str) -> Result<RetrievalTrace> {
        debug!("Step 1: Hybrid search (k={})", self.retrieval.k);
        let raw_candidates = hybrid_search(
            self.index.as_ref(),
            question,
            self.retrieval.k,
            self.retrieval.alpha,
        )
        .await?;

        debug!("Step 2: Reranking {} candidates", raw_candidates.len());
        let rerank = self
            .reranker
            .rerank(question, &raw_candidates, self.retrieval.top_k)
            .await;

        Ok(RetrievalTrace {
            query: question.to_string(),
            raw_candidates,
            rerank,
        })
    }

    /// Retrieve, rerank, and synthesize a grounded answer
    ///
    /// # Errors
    /// - `ConfigError` when no language model is configured
    /// - Index query errors
    /// - LLM errors during synthesis
    pub async fn answer(&self, question: &str) -> Result<RagResponse> {
        info!("Processing RAG query: {}", question);

        let Some(llm) = &self.llm else {
            return Err(ThreadRagError::ConfigError(
                "Answer synthesis needs an LLM API key (set OPENROUTER_API_KEY)".to_string(),
            ));
        };

        let trace = self.retrieve(question).await?;

        debug!("Step 3: Generating answer");
        let context = self.context_assembler.assemble(trace.rerank.candidates());
        let values = HashMap::from([
            ("context", context),
            ("question", question.to_string()),
        ]);
        let request = CompletionRequest::prompt(
            RagPrompts::answer().render(&values),
            self.temperature,
            self.answer_max_tokens,
        );
        let answer = llm.complete(&request).await?;

        info!("RAG query completed successfully");

        let RetrievalTrace {
            query,
            raw_candidates,
            rerank,
        } = trace;
        Ok(RagResponse {
            answer,
            sources: rerank.candidates().to_vec(),
            raw_candidates,
            rerank,
            query,
        })
    }

    #[must_use]
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    #[must_use]
    pub const fn has_llm(&self) -> bool {
        self.llm.is_some()
    }
}

/// Candidates before and after reranking
#[derive(Debug, Clone)]
pub struct RetrievalTrace {
    pub query: String,
    pub raw_candidates: Vec<Candidate>,
    pub rerank: RerankOutcome,
}

impl RetrievalTrace {
    pub fn reranked(&self) -> &[Candidate] {
        self.rerank.candidates()
    }
}

/// RAG response
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: String,
    /// The reranked candidates used as context
    pub sources: Vec<Candidate>,
    pub raw_candidates: Vec<Candidate>,
    pub rerank: RerankOutcome,
    pub query: String,
}

impl RagResponse {
    /// Get a formatted string representation
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Query: {}\n\n", self.query));
        output.push_str(&format!("Answer:\n{}\n\n", self.answer));
        output.push_str(&format!("Sources ({} snippets):\n", self.sources.len()));

        for (idx, source) in self.sources.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} (hybrid: {:.3})\n",
                idx + 1,
                crate::cli::output::truncate_str(&source.text, 80),
                source.hybrid_score
            ));
        }

        if let Some(reason) = self.rerank.fallback_reason() {
            output.push_str(&format!("\nReranking skipped: {reason}\n"));
        }

        output
    }
}
