//! Deterministic feature-hashing embedder
//!
//! Each lower-cased token is hashed with SHA-256 into one of `dimension`
//! buckets with a hash-derived sign, and the vector is L2-normalised. Texts
//! that share words land close together under cosine distance, which is
//! enough for offline use and for reproducible tests.

use async_trait::async_trait;
use sha2::Digest;
use sha2::Sha256;

use super::Embedder;
use crate::errors::Result;
use crate::errors::ThreadRagError;

#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(ThreadRagError::ConfigError(
                "embeddings.dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashEmbedder::new(0).is_err());
    }

    #[test]
    fn test_deterministic_and_normalised() {
        let embedder = HashEmbedder::new(64).unwrap();
        let a = embedder.embed_text("Rust borrow checker");
        let b = embedder.embed_text("Rust borrow checker");
        assert_eq!(a, b);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashEmbedder::new(64).unwrap();
        assert_eq!(
            embedder.embed_text("Coffee, please!"),
            embedder.embed_text("coffee please")
        );
    }

    #[test]
    fn test_shared_words_are_closer() {
        let embedder = HashEmbedder::new(256).unwrap();
        let query = embedder.embed_text("best espresso machine");
        let near = embedder.embed_text("which espresso machine is the best");
        let far = embedder.embed_text("hiking trails near the lake");
        assert!(cosine(&query, &near) > cosine(&query, &far));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16).unwrap();
        assert!(embedder.embed_text("   ").iter().all(|x| *x == 0.0));
    }
}
