//! Ask command handler.

use super::build_engine;
use clap::Args;
use lectern_core::{AppConfig, AppResult};
use lectern_rag::qa;

/// Ask a question grounded in the indexed corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Number of chunks to retrieve
    #[arg(short, long, default_value_t = qa::DEFAULT_TOP_K)]
    pub k: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let engine = build_engine(config)?;
        let store = engine.store.lock().await;

        let artifact = qa::answer(
            &store,
            &engine.generator,
            &engine.prompts,
            &engine.rag_config,
            &self.query,
            &[],
            self.k,
        )
        .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&artifact)?);
            return Ok(());
        }

        match (&artifact.answer, &artifact.redirect) {
            (Some(answer), _) => {
                println!("{}", answer);
                if !artifact.sources.is_empty() {
                    println!("\nSources: {}", artifact.sources.join(", "));
                }
            }
            (None, Some(redirect)) => println!("{}", redirect),
            (None, None) => {}
        }

        Ok(())
    }
}
