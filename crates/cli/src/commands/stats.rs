//! Stats command handler.

use super::build_engine;
use clap::Args;
use lectern_core::{AppConfig, AppResult};

/// Show index and store statistics
#[derive(Args, Debug)]
pub struct StatsCommand {}

impl StatsCommand {
    /// Execute the stats command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = build_engine(config)?;
        let store = engine.store.lock().await;

        println!("Workspace: {}", config.workspace.display());
        println!("Indexed documents: {}", store.size());
        println!("Stored questions: {}", engine.questions.len());
        println!("Embedding model: {} ({} dims)", config.embedding_model, config.embedding_dim);
        println!("Generation model: {}", config.generation_model);

        Ok(())
    }
}
