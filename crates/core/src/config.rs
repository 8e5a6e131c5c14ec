//! Configuration management for the Lectern engine.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.lectern/config.yaml)
//!
//! The configuration is workspace-centric: the index, metadata and question
//! store all live under `.lectern/` inside the workspace.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// Every tuning knob the pipelines consume is an explicit field here with a
/// documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .lectern/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation model identifier (e.g. "mistral", "llama3.2")
    pub generation_model: String,

    /// Embedding provider ("ollama" or "hashing")
    pub embedding_provider: String,

    /// Embedding model identifier (e.g. "nomic-embed-text")
    pub embedding_model: String,

    /// Embedding vector dimension
    pub embedding_dim: usize,

    /// Base URL for the Ollama API
    pub ollama_url: String,

    /// On-topic gate threshold: the top search score must strictly exceed
    /// this value for a query to be admitted
    pub similarity_threshold: f32,

    /// Maximum number of retrieved chunks assembled into prompt context
    pub max_context_chunks: usize,

    /// Per-chunk character cap applied during context assembly
    pub snippet_char_cap: usize,

    /// Generation retry budget; total attempts = max_retries + 1
    pub max_retries: u32,

    /// Fixed interval between generation attempts, in seconds
    pub backoff_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    generation: Option<GenerationConfig>,
    retrieval: Option<RetrievalConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerationConfig {
    model: Option<String>,
    ollama_url: Option<String>,
    max_retries: Option<u32>,
    backoff_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalConfig {
    embedding_provider: Option<String>,
    embedding_model: Option<String>,
    embedding_dim: Option<usize>,
    similarity_threshold: Option<f32>,
    max_context_chunks: Option<usize>,
    snippet_char_cap: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            generation_model: "mistral".to_string(), // Local-first default
            embedding_provider: "ollama".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dim: 768,
            ollama_url: "http://localhost:11434".to_string(),
            similarity_threshold: 0.55,
            max_context_chunks: 5,
            snippet_char_cap: 4000,
            max_retries: 2,
            backoff_secs: 1,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `LECTERN_WORKSPACE`: Override workspace path
    /// - `LECTERN_CONFIG`: Path to config file
    /// - `LECTERN_MODEL`: Generation model identifier
    /// - `LECTERN_EMBED_MODEL`: Embedding model identifier
    /// - `OLLAMA_URL`: Ollama API base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("LECTERN_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("LECTERN_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Validate workspace exists
        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join(".lectern/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("LECTERN_MODEL") {
            config.generation_model = model;
        }

        if let Ok(model) = std::env::var("LECTERN_EMBED_MODEL") {
            config.embedding_model = model;
        }

        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.ollama_url = url;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(generation) = config_file.generation {
            if let Some(model) = generation.model {
                result.generation_model = model;
            }
            if let Some(url) = generation.ollama_url {
                result.ollama_url = url;
            }
            if let Some(retries) = generation.max_retries {
                result.max_retries = retries;
            }
            if let Some(backoff) = generation.backoff_secs {
                result.backoff_secs = backoff;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(provider) = retrieval.embedding_provider {
                result.embedding_provider = provider;
            }
            if let Some(model) = retrieval.embedding_model {
                result.embedding_model = model;
            }
            if let Some(dim) = retrieval.embedding_dim {
                result.embedding_dim = dim;
            }
            if let Some(threshold) = retrieval.similarity_threshold {
                result.similarity_threshold = threshold;
            }
            if let Some(chunks) = retrieval.max_context_chunks {
                result.max_context_chunks = chunks;
            }
            if let Some(cap) = retrieval.snippet_char_cap {
                result.snippet_char_cap = cap;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        model: Option<String>,
        embed_model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = model {
            self.generation_model = model;
        }

        if let Some(embed_model) = embed_model {
            self.embedding_model = embed_model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .lectern directory.
    pub fn lectern_dir(&self) -> PathBuf {
        self.workspace.join(".lectern")
    }

    /// Ensure the .lectern directory exists.
    pub fn ensure_lectern_dir(&self) -> AppResult<()> {
        let lectern_dir = self.lectern_dir();
        if !lectern_dir.exists() {
            std::fs::create_dir_all(&lectern_dir).map_err(|e| {
                AppError::Config(format!("Failed to create .lectern directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "hashing"];
        if !known_providers.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_providers.join(", ")
            )));
        }

        if self.embedding_dim == 0 {
            return Err(AppError::Config(
                "Embedding dimension must be greater than zero".to_string(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AppError::Config(format!(
                "Similarity threshold must lie in [-1, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.max_context_chunks == 0 {
            return Err(AppError::Config(
                "max_context_chunks must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.generation_model, "mistral");
        assert_eq!(config.embedding_model, "nomic-embed-text");
        assert_eq!(config.embedding_dim, 768);
        assert_eq!(config.similarity_threshold, 0.55);
        assert_eq!(config.max_context_chunks, 5);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.backoff_secs, 1);
        assert!(!config.verbose);
    }

    #[test]
    fn test_lectern_dir() {
        let config = AppConfig::default();
        let dir = config.lectern_dir();
        assert!(dir.ends_with(".lectern"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("llama3.2".to_string()),
            None,
            None,
            true,
            false,
        );

        assert_eq!(overridden.generation_model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.embedding_provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_threshold() {
        let mut config = AppConfig::default();
        config.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_defaults_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_yaml() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "generation:\n  model: llama3.2\n  max_retries: 4\nretrieval:\n  similarity_threshold: 0.4\n",
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.generation_model, "llama3.2");
        assert_eq!(merged.max_retries, 4);
        assert_eq!(merged.similarity_threshold, 0.4);
        // Untouched fields keep their defaults
        assert_eq!(merged.embedding_dim, 768);
    }
}
