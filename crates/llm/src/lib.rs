//! Generation backend integration for the Lectern engine.
//!
//! This crate provides a provider-agnostic abstraction for invoking a
//! text-generation backend, plus the bounded-retry client the orchestrators
//! use.
//!
//! # Example
//! ```no_run
//! use lectern_llm::{GenerationClient, providers::OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(OllamaClient::new());
//! let client = GenerationClient::new(backend, "mistral");
//! let text = client.generate("Explain photosynthesis briefly.").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generation;
pub mod providers;

// Re-export main types
pub use client::{GenerationBackend, GenerationRequest};
pub use factory::create_backend;
pub use generation::{GenerationClient, DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES};
pub use providers::OllamaClient;
