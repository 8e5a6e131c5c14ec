//! Generation backend factory.
//!
//! This module provides a factory for creating generation backends based on
//! application configuration.

use crate::client::GenerationBackend;
use crate::providers::OllamaClient;
use lectern_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a generation backend based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "ollama")
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown.
pub fn create_backend(
    provider: &str,
    endpoint: Option<&str>,
) -> AppResult<Arc<dyn GenerationBackend>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client = OllamaClient::with_base_url(base_url);
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown generation provider: {}",
            provider
        ))),
    }
}
