//! Embedding provider trait and factory.

use lectern_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding backends.
///
/// Maps a batch of strings to fixed-dimension float vectors. Vectors are
/// returned as produced by the backend; L2 normalization is the vector
/// store's responsibility.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "hashing")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Ingestion("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(
    provider: &str,
    model: &str,
    dimensions: usize,
    endpoint: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider {
        "ollama" => {
            let embedder = super::providers::ollama::OllamaEmbedder::new(
                endpoint.unwrap_or("http://localhost:11434"),
                model,
                dimensions,
            )?;
            Ok(Arc::new(embedder))
        }

        "hashing" => {
            let embedder = super::providers::hashing::HashingEmbedder::new(dimensions);
            Ok(Arc::new(embedder))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, hashing",
            provider
        ))),
    }
}
