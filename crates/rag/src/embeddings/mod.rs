//! Embedding backends for the vector store.
//!
//! Provides a provider-agnostic trait plus two implementations: the Ollama
//! HTTP provider and a deterministic offline hashing provider.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{HashingEmbedder, OllamaEmbedder};
