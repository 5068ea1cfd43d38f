//! Simplified term-frequency density score
//!
//! This is a cheap lexical proxy, not BM25: there is no inverse document
//! frequency and the only length normalisation is `1 + word_count(text)`.
//! Query terms are matched as lower-cased substrings of the lower-cased text,
//! and repeated query terms count once per repetition.

/// Sum over query terms of `occurrences(term, text) / (1 + words(text))`
pub fn lexical_score(text: &str, query: &str) -> f32 {
    let text = text.to_lowercase();
    let query = query.to_lowercase();

    let norm = 1.0 + text.split_whitespace().count() as f32;

    query
        .split_whitespace()
        .map(|term| text.matches(term).count() as f32 / norm)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        let score = lexical_score("the cat sat on the mat", "cat mat");
        assert!((score - 2.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_case_insensitive() {
        let score = lexical_score("The CAT sat", "cat");
        assert!((score - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_query_terms_count_twice() {
        let once = lexical_score("the cat sat on the mat", "cat");
        let twice = lexical_score("the cat sat on the mat", "cat cat");
        assert!((twice - 2.0 * once).abs() < 1e-6);
    }

    #[test]
    fn test_substring_occurrences_count() {
        // "cat" occurs inside "concatenate" as well
        let score = lexical_score("cat concatenate", "cat");
        assert!((score - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(lexical_score("", "cat"), 0.0);
        assert_eq!(lexical_score("the cat", ""), 0.0);
        assert_eq!(lexical_score("the cat", "   "), 0.0);
    }

    #[test]
    fn test_never_negative() {
        assert!(lexical_score("nothing matches here", "zebra quokka") >= 0.0);
    }
}
