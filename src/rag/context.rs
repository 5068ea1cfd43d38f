//! Context assembly from ranked candidates

use crate::models::Candidate;

/// Smallest excerpt worth including when a snippet must be cut
const MIN_EXCERPT_BYTES: usize = 80;

/// Numbers snippets within a byte budget. A snippet that does not fit is cut
/// to the remaining space, or skipped when too little space is left; shorter
/// snippets after it may still fit. Numbers follow the candidate positions.
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Assemble `[n]`-numbered snippets for the answer prompt
    #[must_use]
    pub fn assemble(&self, candidates: &[Candidate]) -> String {
        let mut context = String::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            let label = format!("[{}] ", idx + 1);
            let text = candidate.text.trim();
            let remaining = self.max_context_length.saturating_sub(context.len());
            let overhead = label.len() + 2;

            if overhead + text.len() <= remaining {
                context.push_str(&label);
                context.push_str(text);
                context.push_str("\n\n");
            } else if remaining >= overhead + MIN_EXCERPT_BYTES {
                context.push_str(&label);
                context.push_str(excerpt(text, remaining - overhead - 3));
                context.push_str("...\n\n");
            }
        }

        context.trim_end().to_string()
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(8000)
    }
}

/// Longest prefix of `text` within `max_bytes`, cut at a char boundary
fn excerpt(text: &str, max_bytes: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}
