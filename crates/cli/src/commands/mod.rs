//! Command handlers for the Lectern CLI.

mod ask;
mod ingest;
mod quiz;
mod stats;
mod summarize;

pub use ask::AskCommand;
pub use ingest::IngestCommand;
pub use quiz::QuizCommand;
pub use stats::StatsCommand;
pub use summarize::SummarizeCommand;

use lectern_core::{AppConfig, AppResult};
use lectern_llm::{create_backend, GenerationClient};
use lectern_prompt::PromptBuilder;
use lectern_rag::embeddings::create_provider;
use lectern_rag::{
    QuestionArtifact, RagConfig, Repository, SharedVectorStore, SummaryArtifact, VectorStore,
};
use std::time::Duration;

/// Explicitly constructed engine state shared by the commands.
///
/// There is no global store: each invocation builds the pieces and passes
/// them by reference into the pipelines.
pub struct Engine {
    pub rag_config: RagConfig,
    pub store: SharedVectorStore,
    pub generator: GenerationClient,
    pub prompts: PromptBuilder,
    pub summaries: Repository<SummaryArtifact>,
    pub questions: Repository<QuestionArtifact>,
}

/// Build the engine from application configuration.
pub fn build_engine(config: &AppConfig) -> AppResult<Engine> {
    let rag_config = RagConfig::from_app(config);

    let embedder = create_provider(
        &config.embedding_provider,
        &config.embedding_model,
        config.embedding_dim,
        Some(&config.ollama_url),
    )?;

    let store = VectorStore::open(&rag_config, embedder).into_shared();

    let backend = create_backend("ollama", Some(&config.ollama_url))?;
    let generator = GenerationClient::new(backend, &config.generation_model)
        .with_max_retries(config.max_retries)
        .with_backoff(Duration::from_secs(config.backoff_secs));

    let prompts = PromptBuilder::new()?;

    let summaries = Repository::in_memory();
    let questions = Repository::with_store_file(rag_config.question_store_path.clone());

    Ok(Engine {
        rag_config,
        store,
        generator,
        prompts,
        summaries,
        questions,
    })
}
