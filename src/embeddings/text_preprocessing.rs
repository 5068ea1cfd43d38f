//! Text preprocessing utilities for embedding generation
//!
//! Social posts arrive with hard line breaks, tabs and the odd control
//! character; embedding APIs are given a single-spaced, printable version.

use tracing::debug;

use crate::errors::Result;
use crate::errors::ThreadRagError;

/// Normalize whitespace and strip control characters.
/// Fails when nothing printable remains.
pub fn preprocess_text_for_embedding(text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(ThreadRagError::EmbeddingError(
            "Empty text provided".to_string(),
        ));
    }

    let sanitized = sanitize_text(&normalize_whitespace(text));

    if sanitized.is_empty() {
        return Err(ThreadRagError::EmbeddingError(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    debug!(
        "Preprocessed text: {} -> {} chars",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Collapse every whitespace run (newlines and tabs included) to one space
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Replace control characters with spaces, keep everything else (emoji too)
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
