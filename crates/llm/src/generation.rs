//! Retrying wrapper around a generation backend.
//!
//! [`GenerationClient`] owns the retry policy for generation calls: a fixed
//! sleep between attempts and a bounded attempt count, after which the call
//! fails with `GenerationUnavailable`. There is no exponential backoff,
//! jitter, or circuit breaker.

use crate::client::{GenerationBackend, GenerationRequest};
use lectern_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Default retry budget: total attempts = DEFAULT_MAX_RETRIES + 1.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default interval between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Generation client with bounded fixed-interval retry.
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    model: String,
    max_retries: u32,
    backoff: Duration,
}

impl GenerationClient {
    /// Create a client with the default retry policy.
    pub fn new(backend: Arc<dyn GenerationBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Set the retry budget. Total attempts = max_retries + 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the fixed interval slept between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// The model identifier requests are issued against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text for a prompt.
    ///
    /// Issues up to `max_retries + 1` attempts against the backend, sleeping
    /// the configured interval between attempts. Returns the first
    /// successful response; after exhaustion, fails with
    /// [`AppError::GenerationUnavailable`].
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = GenerationRequest::new(prompt, &self.model);
        let attempts = self.max_retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            tracing::info!(
                "Calling generation backend '{}', model '{}' (attempt {}/{})",
                self.backend.backend_name(),
                self.model,
                attempt,
                attempts
            );

            match self.backend.complete(&request).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!("Generation attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = Some(e);

                    if attempt < attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }

        let cause = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(AppError::GenerationUnavailable(format!(
            "All {} attempts failed; last error: {}",
            attempts, cause
        )))
    }
}
