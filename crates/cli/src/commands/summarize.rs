//! Summarize command handler.

use super::build_engine;
use clap::Args;
use lectern_core::{AppConfig, AppResult};
use lectern_rag::summary::{self, SummaryOptions};
use std::path::PathBuf;

/// Summarize a text file
#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// Text file to summarize
    pub file: PathBuf,

    /// Summary identifier (default: fresh UUID)
    #[arg(long)]
    pub id: Option<String>,

    /// Source label stored with the summary
    #[arg(long)]
    pub source: Option<String>,

    /// Maximum TOC depth
    #[arg(long, default_value_t = 3)]
    pub toc_levels: usize,

    /// Number of key sentences for the extractive step
    #[arg(long, default_value_t = 8)]
    pub sentences: usize,

    /// Tone for the abstractive summary (e.g. concise, detailed)
    #[arg(long, default_value = "concise")]
    pub style: String,

    /// Editor feedback carried into the abstractive pass
    #[arg(long)]
    pub feedback: Option<String>,
}

impl SummarizeCommand {
    /// Execute the summarize command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing summarize command for {:?}", self.file);

        let text = std::fs::read_to_string(&self.file)?;
        let engine = build_engine(config)?;

        let options = SummaryOptions {
            summary_id: self.id.clone(),
            source: self
                .source
                .clone()
                .or_else(|| Some(self.file.to_string_lossy().to_string())),
            toc_levels: self.toc_levels,
            extractive_sentences: self.sentences,
            style: self.style.clone(),
            feedback: self.feedback.clone(),
        };

        let artifact = summary::create_summary(
            &engine.generator,
            &engine.prompts,
            &engine.summaries,
            &text,
            options,
        )
        .await?;

        println!("{}", serde_json::to_string_pretty(&artifact)?);
        Ok(())
    }
}
