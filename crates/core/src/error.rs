//! Error types for the Lectern engine.
//!
//! This module defines a unified error enum covering every failure category
//! the pipelines can surface: configuration, I/O, ingestion, persistence,
//! generation transport, output parsing, and unsupported task inputs.

use thiserror::Error;

/// Unified error type for the Lectern engine.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding or index-append failure. Fatal to the call; the vector
    /// store is left unchanged.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Durability write failure. Logged and swallowed by the store and
    /// repositories; the in-memory state stays usable.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The generation backend could not be reached after all retry
    /// attempts were exhausted.
    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),

    /// Generated text was not valid JSON or violated the expected schema.
    /// No partial result is produced.
    #[error("Malformed generation output: {0}")]
    MalformedOutput(String),

    /// Unrecognized task variant. Rejected at the boundary; generation is
    /// never invoked.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
