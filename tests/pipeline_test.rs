use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use threadrag::chunking::Chunker;
use threadrag::config::ChunkingConfig;
use threadrag::embeddings::HashEmbedder;
use threadrag::index::DistanceMetric;
use threadrag::index::InMemoryIndex;
use threadrag::index::VectorIndex;
use threadrag::llm::CompletionRequest;
use threadrag::llm::LlmClient;
use threadrag::models::Neighbor;
use threadrag::rag::FallbackReason;
use threadrag::rag::RagService;
use threadrag::rag::Reranker;
use threadrag::search::hybrid_search;
use threadrag::search::rank_neighbors;
use threadrag::AppConfig;
use threadrag::Result;
use threadrag::ThreadRagError;

const THREAD: &str = "Sour espresso usually means the grind is too coarse. \
    Try a finer grind and a longer shot. \
    My cat knocks the portafilter off the counter every morning. \
    Chain oil keeps a road bike quiet in the rain. \
    Bitter espresso is the opposite problem, so grind coarser. \
    Fresh beans matter more than the grinder for most people.";

/// Replies from a script, one entry per call
struct ScriptedLlm {
    replies: Mutex<Vec<Result<String>>>,
    calls: Mutex<usize>,
}

impl ScriptedLlm {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ThreadRagError::LlmError("script exhausted".to_string())))
    }
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.chunking = ChunkingConfig {
        max_tokens: 16,
        min_tokens: 1,
        overlap: 0,
    };
    config.retrieval.k = 5;
    config.retrieval.top_k = 3;
    config
}

fn service(llm: Option<Arc<dyn LlmClient>>) -> RagService {
    service_with(&config(), llm)
}

fn service_with(config: &AppConfig, llm: Option<Arc<dyn LlmClient>>) -> RagService {
    let embedder = Arc::new(HashEmbedder::new(384).unwrap());
    let index = Arc::new(InMemoryIndex::new(
        "threadrag_espresso",
        DistanceMetric::Cosine,
        embedder,
    ));
    RagService::from_parts(config, index, llm)
}

#[tokio::test]
async fn test_end_to_end_answer() -> Result<()> {
    let llm = ScriptedLlm::new(vec![
        Ok("```json\n[2, 0]\n```".to_string()),
        Ok("Grind finer.".to_string()),
    ]);
    let service = service(Some(llm.clone()));

    let chunks = service.ingest(THREAD).await?;
    assert!(chunks >= 3);

    let response = service.answer("why is my espresso sour").await?;
    assert_eq!(response.answer, "Grind finer.");
    assert!(response.rerank.is_reordered());
    assert_eq!(response.sources.len(), 2);
    assert_eq!(response.sources[0], response.raw_candidates[2]);
    assert_eq!(response.sources[1], response.raw_candidates[0]);
    assert_eq!(llm.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rerank_failure_still_answers() -> Result<()> {
    let llm = ScriptedLlm::new(vec![
        Err(ThreadRagError::HttpError("connection reset".to_string())),
        Ok("Use fresh beans.".to_string()),
    ]);
    let service = service(Some(llm));
    service.ingest(THREAD).await?;

    let response = service.answer("grinder or beans").await?;
    assert_eq!(response.answer, "Use fresh beans.");
    assert_eq!(
        response.sources,
        response.raw_candidates[..response.sources.len()].to_vec()
    );
    assert!(matches!(
        response.rerank.fallback_reason(),
        Some(FallbackReason::RequestFailed(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_synthesis_failure_propagates() -> Result<()> {
    let llm = ScriptedLlm::new(vec![
        Ok("[0]".to_string()),
        Err(ThreadRagError::LlmError("rate limited".to_string())),
    ]);
    let service = service(Some(llm));
    service.ingest(THREAD).await?;

    let result = service.answer("espresso").await;
    assert!(matches!(result, Err(ThreadRagError::LlmError(_))));
    Ok(())
}

#[tokio::test]
async fn test_lexical_only_retrieval_prefers_query_terms() -> Result<()> {
    let mut config = config();
    config.retrieval.alpha = 0.0;
    let service = service_with(&config, None);
    service.ingest(THREAD).await?;

    let trace = service.retrieve("espresso").await?;
    assert!(trace.raw_candidates.len() <= 5);
    assert!(trace.raw_candidates[0].text.to_lowercase().contains("espresso"));
    assert!(trace.raw_candidates[0].lexical_score > 0.0);
    for pair in trace.raw_candidates.windows(2) {
        assert!(pair[0].hybrid_score >= pair[1].hybrid_score);
    }
    assert_eq!(trace.reranked().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_hybrid_search_over_index_directly() -> Result<()> {
    let embedder = Arc::new(HashEmbedder::new(128)?);
    let index = InMemoryIndex::new("direct", DistanceMetric::Cosine, embedder);
    let chunks = Chunker::new(config().chunking).chunk(THREAD);
    index.index(&chunks).await?;

    let candidates = hybrid_search(&index, "grind", 2, 0.7).await?;
    assert_eq!(candidates.len(), 2);

    let empty = hybrid_search(&index, "grind", 0, 0.7).await?;
    assert!(empty.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reranker_on_fixed_candidates() {
    let neighbors = vec![
        Neighbor {
            text: "the cat sat on the mat".to_string(),
            distance: 0.1,
            metadata: Default::default(),
        },
        Neighbor {
            text: "dogs bark".to_string(),
            distance: 0.2,
            metadata: Default::default(),
        },
    ];
    let candidates = rank_neighbors(neighbors, "cat", 2, 0.7);
    assert!((candidates[0].hybrid_score - (0.7 * 0.9 + 0.3 * (1.0 / 7.0))).abs() < 1e-5);

    let llm = ScriptedLlm::new(vec![Ok("[1, 7, 0]".to_string())]);
    let outcome = Reranker::new(Some(llm)).rerank("cat", &candidates, 3).await;
    let texts: Vec<&str> = outcome.candidates().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["dogs bark", "the cat sat on the mat"]);
}
