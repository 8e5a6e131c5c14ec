//! End-to-end scenario tests for the task pipelines.
//!
//! Uses a scripted generation backend and a planned embedder so the
//! pipelines run without network access and produce exact, assertable
//! values.

mod scenarios;

use crate::embeddings::EmbeddingProvider;
use lectern_core::{AppError, AppResult};
use lectern_llm::{GenerationBackend, GenerationRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Generation backend replaying scripted outcomes in order.
///
/// Once the script is exhausted, further calls fail.
pub(crate) struct ScriptedBackend {
    script: Mutex<Vec<Result<String, String>>>,
    pub calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok((*t).to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for ScriptedBackend {
    fn backend_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &GenerationRequest) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(AppError::GenerationUnavailable("script exhausted".to_string()));
        }

        match script.remove(0) {
            Ok(text) => Ok(text),
            Err(message) => Err(AppError::GenerationUnavailable(message)),
        }
    }
}

/// Embedder returning pre-planned vectors for exact texts.
#[derive(Debug)]
pub(crate) struct PlannedEmbedder {
    dim: usize,
    plans: HashMap<String, Vec<f32>>,
}

impl PlannedEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            plans: HashMap::new(),
        }
    }

    pub fn plan(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.plans.insert(text.to_string(), vector);
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for PlannedEmbedder {
    fn provider_name(&self) -> &str {
        "planned"
    }

    fn model_name(&self) -> &str {
        "planned"
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.plans.get(text).cloned().ok_or_else(|| {
                    AppError::Ingestion(format!("No planned vector for '{}'", text))
                })
            })
            .collect()
    }
}
