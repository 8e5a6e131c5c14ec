//! Hashing embedding provider.
//!
//! Generates deterministic embeddings from character trigrams and word
//! frequencies. Not semantically accurate like a neural model, but the
//! vectors are consistent and content-dependent, which makes this provider
//! suitable for offline development and tests.

use crate::embeddings::provider::EmbeddingProvider;
use lectern_core::AppResult;
use std::collections::HashMap;

/// Common words excluded from the vector signal.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Deterministic trigram/word-frequency embedder.
#[derive(Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Create a new hashing embedder with the given dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate an embedding for a text.
    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w))
            .collect();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in &words {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();

            // Character trigrams spread each word over several dimensions
            for window in chars.windows(3) {
                let slot = hash_chars(window, 37) as usize % self.dimensions;
                embedding[slot] += (*freq as f32).sqrt();
            }

            // Whole-word signal
            let slot = hash_chars(&chars, 31) as usize % self.dimensions;
            embedding[slot] += *freq as f32;
        }

        // Unit-length output; an empty text stays a zero vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

/// Multiplicative rolling hash over a char sequence.
fn hash_chars(chars: &[char], multiplier: u64) -> u64 {
    chars.iter().fold(0u64, |acc, &c| {
        acc.wrapping_mul(multiplier).wrapping_add(c as u64)
    })
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn provider_name(&self) -> &str {
        "hashing"
    }

    fn model_name(&self) -> &str {
        "hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let provider = HashingEmbedder::new(384);
        assert_eq!(provider.dimensions(), 384);
        assert_eq!(provider.provider_name(), "hashing");
        assert_eq!(provider.model_name(), "hash-v1");
    }

    #[tokio::test]
    async fn test_embedding_is_unit_length() {
        let provider = HashingEmbedder::new(384);
        let embedding = provider.embed("hello world").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = HashingEmbedder::new(384);
        let a = provider.embed("deterministic test").await.unwrap();
        let b = provider.embed("deterministic test").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let provider = HashingEmbedder::new(384);
        let a = provider.embed("hello world").await.unwrap();
        let b = provider.embed("goodbye world").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashingEmbedder::new(384);
        let embedding = provider.embed("").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_utf8_safety() {
        let provider = HashingEmbedder::new(384);
        let embedding = provider
            .embed("fotossíntese converte luz em energia 🌿")
            .await
            .unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
