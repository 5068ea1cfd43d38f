//! Sentence-bounded, token-budgeted chunking with sentence overlap
//!
//! Text is split at `.`, `!` or `?` followed by whitespace. Sentences are
//! packed into a buffer until the next one would push the running estimate
//! past `max_tokens`; the buffer is then closed out and the next buffer is
//! seeded with the last `overlap` sentences. Closed buffers whose joined text
//! estimates below `min_tokens` are dropped, the trailing one included.

use tracing::debug;

use crate::config::ChunkingConfig;
use crate::models::Chunk;

/// Characters per estimated token
const CHARS_PER_TOKEN: usize = 4;

/// Crude, reproducible token estimate: character count divided by four
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Split at whitespace runs that follow sentence punctuation.
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            push_sentence(&mut sentences, &text[start..idx]);
            while chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map_or(text.len(), |&(i, _)| i);
        }
        prev = Some(ch);
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

/// Stateless chunker over a fixed configuration
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    #[must_use]
    pub const fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Chunk one text blob. Empty input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let ChunkingConfig {
            max_tokens,
            min_tokens,
            overlap,
        } = self.config;

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_tokens = 0;

        for sentence in split_sentences(text) {
            let tokens = estimate_tokens(sentence);

            if !current.is_empty() && current_tokens + tokens > max_tokens {
                self.close_out(&current, &mut chunks);

                let carried = &current[current.len().saturating_sub(overlap)..];
                let mut next = carried.to_vec();
                current_tokens = carried.iter().map(|s| estimate_tokens(s)).sum::<usize>() + tokens;
                next.push(sentence);
                current = next;
            } else {
                current.push(sentence);
                current_tokens += tokens;
            }
        }

        if !current.is_empty() {
            self.close_out(&current, &mut chunks);
        }

        debug!(
            "Chunked {} chars into {} chunks (max {}, min {}, overlap {})",
            text.len(),
            chunks.len(),
            max_tokens,
            min_tokens,
            overlap
        );

        chunks
    }

    fn close_out(&self, sentences: &[&str], chunks: &mut Vec<Chunk>) {
        let text = sentences.join(" ");
        let token_estimate = estimate_tokens(&text);
        if token_estimate >= self.config.min_tokens {
            chunks.push(Chunk {
                text,
                token_estimate,
                sentence_count: sentences.len(),
            });
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_tokens: usize, min_tokens: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkingConfig {
            max_tokens,
            min_tokens,
            overlap,
        })
    }

    /// Sentence of exactly `tokens * 4` characters ending in a period
    fn sentence(tag: char, tokens: usize) -> String {
        let mut s: String = std::iter::repeat(tag).take(tokens * 4 - 1).collect();
        s.push('.');
        s
    }

    fn corpus(tags: &[(char, usize)]) -> String {
        tags.iter()
            .map(|&(tag, tokens)| sentence(tag, tokens))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
    }

    #[test]
    fn test_estimate_tokens_counts_characters_not_bytes() {
        assert_eq!(estimate_tokens("éééé"), 1);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second!  Third?\n\nFourth");
        assert_eq!(sentences, vec!["First one.", "Second!", "Third?", "Fourth"]);
    }

    #[test]
    fn test_split_requires_whitespace_after_punctuation() {
        assert_eq!(split_sentences("v1.2 is out.Next"), vec!["v1.2 is out.Next"]);
    }

    #[test]
    fn test_split_drops_blank_pieces() {
        assert!(split_sentences("   \n\t ").is_empty());
        assert_eq!(split_sentences("  Hi.   "), vec!["Hi."]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(Chunker::default().chunk("").is_empty());
        assert!(chunker(10, 0, 1).chunk("   ").is_empty());
    }

    #[test]
    fn test_single_small_chunk() {
        let chunks = chunker(100, 1, 2).chunk("Hello there. How are you?");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello there. How are you?");
        assert_eq!(chunks[0].token_estimate, estimate_tokens("Hello there. How are you?"));
        assert_eq!(chunks[0].sentence_count, 2);
    }

    #[test]
    fn test_sentences_joined_by_single_space() {
        let chunks = chunker(100, 0, 0).chunk("One.\n\n  Two.\tThree.");
        assert_eq!(chunks[0].text, "One. Two. Three.");
    }

    #[test]
    fn test_budget_split_with_overlap() {
        // a=10, b=10, c=10 tokens; budget 25 closes after a+b
        let text = corpus(&[('a', 10), ('b', 10), ('c', 10)]);
        let chunks = chunker(25, 0, 1).chunk(&text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, format!("{} {}", sentence('a', 10), sentence('b', 10)));
        assert_eq!(chunks[1].text, format!("{} {}", sentence('b', 10), sentence('c', 10)));
    }

    #[test]
    fn test_overlap_larger_than_buffer_carries_everything() {
        let text = corpus(&[('a', 10), ('b', 30)]);
        let chunks = chunker(25, 0, 5).chunk(&text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, sentence('a', 10));
        assert_eq!(chunks[1].text, format!("{} {}", sentence('a', 10), sentence('b', 30)));
    }

    #[test]
    fn test_zero_overlap_carries_nothing() {
        let text = corpus(&[('a', 10), ('b', 10), ('c', 10)]);
        let chunks = chunker(15, 0, 0).chunk(&text);

        let texts: Vec<_> = chunks.iter().map(|c| c.text.clone()).collect();
        assert_eq!(
            texts,
            vec![sentence('a', 10), sentence('b', 10), sentence('c', 10)]
        );
    }

    #[test]
    fn test_oversized_sentence_becomes_own_chunk() {
        let text = corpus(&[('a', 5), ('b', 50), ('c', 5)]);
        let chunks = chunker(20, 0, 0).chunk(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].text, sentence('b', 50));
        assert!(chunks[1].token_estimate > 20);
    }

    #[test]
    fn test_trailing_chunk_below_floor_is_dropped() {
        let text = corpus(&[('a', 20), ('b', 20), ('c', 3)]);
        let chunks = chunker(40, 15, 0).chunk(&text);

        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].text.contains('c'));
    }

    #[test]
    fn test_every_chunk_clears_token_floor() {
        let lengths = [3, 17, 2, 40, 9, 9, 1, 25, 6, 12, 30, 4];
        let tags = "abcdefghijkl";
        let pairs: Vec<(char, usize)> = tags.chars().zip(lengths).collect();
        let text = corpus(&pairs);

        for min_tokens in [0, 5, 20, 45] {
            for chunk in chunker(35, min_tokens, 2).chunk(&text) {
                assert!(estimate_tokens(&chunk.text) >= min_tokens);
                assert_eq!(chunk.token_estimate, estimate_tokens(&chunk.text));
            }
        }
    }

    #[test]
    fn test_overlap_continuity_and_budget() {
        let lengths = [8, 8, 8, 8, 8, 8, 8, 8, 8, 8];
        let pairs: Vec<(char, usize)> = "abcdefghij".chars().zip(lengths).collect();
        let text = corpus(&pairs);
        let overlap = 2;
        let chunks = chunker(30, 0, overlap).chunk(&text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev = split_sentences(&pair[0].text);
            let next = split_sentences(&pair[1].text);
            assert_eq!(prev.len(), pair[0].sentence_count);
            if prev.len() >= overlap {
                assert_eq!(&next[..overlap], &prev[prev.len() - overlap..]);
            }
        }
        for chunk in &chunks {
            let sum: usize = split_sentences(&chunk.text)
                .iter()
                .map(|s| estimate_tokens(s))
                .sum();
            if chunk.sentence_count > 1 {
                assert!(sum <= 30);
            }
        }
    }
}
