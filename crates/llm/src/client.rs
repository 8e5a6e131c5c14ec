//! Generation backend abstraction and request types.
//!
//! This module defines the core abstractions for invoking a text-generation
//! backend. Retry policy lives in [`crate::generation`], not here: a backend
//! performs exactly one attempt per call.

use lectern_core::AppResult;
use serde::{Deserialize, Serialize};

/// A single text-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The fully rendered prompt text
    pub prompt: String,

    /// Model identifier (e.g., "mistral", "llama3.2")
    pub model: String,
}

impl GenerationRequest {
    /// Create a new generation request.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Trait for text-generation backends.
///
/// This trait abstracts the underlying provider and is intentionally
/// text-in/text-out: callers hand over a rendered prompt and receive the raw
/// generated text. Structure is imposed downstream by the output parsers.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the backend name (e.g., "ollama").
    fn backend_name(&self) -> &str;

    /// Perform a single completion attempt.
    ///
    /// Transport failures and non-success responses are returned as errors;
    /// no retry happens at this layer.
    async fn complete(&self, request: &GenerationRequest) -> AppResult<String>;
}
