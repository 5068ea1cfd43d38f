//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `threadrag` CLI

use std::io::Write;

use crate::models::Candidate;
use crate::models::Chunk;
use crate::rag::RetrievalTrace;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8 characters (emojis, etc.)
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Show only the last four characters of a secret
#[must_use]
pub fn mask_api_key(key: Option<&str>) -> String {
    match key {
        None | Some("") => "(not set)".to_string(),
        Some(key) => {
            let count = key.chars().count();
            if count <= 8 {
                "****".to_string()
            } else {
                let tail: String = key.chars().skip(count - 4).collect();
                format!("****{tail}")
            }
        }
    }
}

/// Print chunk list
pub fn print_chunk_list(chunks: &[Chunk], preview_chars: usize) {
    println!("Produced {} chunks:", chunks.len());
    for (idx, chunk) in chunks.iter().enumerate() {
        println!();
        println!(
            "  #{idx} | ~{} tokens | {} sentences",
            chunk.token_estimate, chunk.sentence_count
        );
        println!("  {}", truncate_str(&chunk.text, preview_chars));
    }
}

/// Print scored candidates under a heading
pub fn print_candidate_list(title: &str, candidates: &[Candidate], preview_chars: usize) {
    println!("{title} ({}):", candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        println!(
            "  [{idx}] hybrid {:.3} | vector {:.3} | lexical {:.3}",
            candidate.hybrid_score, candidate.similarity_score, candidate.lexical_score
        );
        println!("      {}", truncate_str(&candidate.text, preview_chars));
    }
}

/// Print raw and reranked candidates side by side
pub fn print_retrieval_trace(trace: &RetrievalTrace, preview_chars: usize) {
    println!("🔍 Query: \"{}\"", trace.query);
    println!();
    print_candidate_list("Hybrid candidates", &trace.raw_candidates, preview_chars);
    println!();
    print_candidate_list("Reranked", trace.reranked(), preview_chars);
    if let Some(reason) = trace.rerank.fallback_reason() {
        println!();
        print_warning(&format!("Reranking skipped: {reason}"));
    }
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 threadrag Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    match &config.logging.log_dir {
        Some(dir) => println!("  Log dir: {}", dir.display()),
        None => println!("  Log dir: (console only)"),
    }
    println!();

    println!("✂️  Chunking:");
    println!("  Max tokens: {}", config.chunking.max_tokens);
    println!("  Min tokens: {}", config.chunking.min_tokens);
    println!("  Overlap sentences: {}", config.chunking.overlap);
    println!();

    println!("🔍 Retrieval:");
    println!("  k: {}", config.retrieval.k);
    println!("  top_k: {}", config.retrieval.top_k);
    println!("  alpha: {}", config.retrieval.alpha);
    println!("  Rerank window: {}", config.retrieval.rerank_window);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm.model);
    println!("  API key: {}", mask_api_key(config.llm.api_key.as_deref()));
    println!("  Timeout: {}s", config.llm.timeout_secs);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.resolved_provider());
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embeddings.model);
    println!(
        "  API key: {}",
        mask_api_key(config.embeddings.api_key.as_deref())
    );
    println!();

    println!("🗂️  Index:");
    println!("  Collection prefix: {}", config.index.name);
    println!("  Distance: {:?}", config.index.distance);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    // A failed flush only delays the prompt text
    let _ = std::io::stdout().flush();
}
