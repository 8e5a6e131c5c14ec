//! Quiz command handler.

use super::build_engine;
use clap::Args;
use lectern_core::{AppConfig, AppResult};
use lectern_rag::question::{self, QuestionRequest};
use lectern_rag::QuestionKind;
use std::path::PathBuf;

/// Generate quiz questions from a text file
#[derive(Args, Debug)]
pub struct QuizCommand {
    /// Text file to generate questions from
    pub file: PathBuf,

    /// Question type: mcq or tf
    #[arg(long, default_value = "mcq")]
    pub kind: String,

    /// Number of questions to generate
    #[arg(short = 'n', long, default_value_t = 3)]
    pub count: usize,

    /// Difficulty level, 1-5
    #[arg(long, default_value_t = 2)]
    pub difficulty: u8,

    /// Source label stored with each question
    #[arg(long)]
    pub source: Option<String>,
}

impl QuizCommand {
    /// Execute the quiz command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing quiz command for {:?}", self.file);

        // Unknown kinds are rejected here, before any backend call
        let kind: QuestionKind = self.kind.parse()?;

        let text = std::fs::read_to_string(&self.file)?;
        let engine = build_engine(config)?;

        let request = QuestionRequest {
            source: self
                .source
                .clone()
                .or_else(|| Some(self.file.to_string_lossy().to_string())),
            kind,
            count: self.count,
            difficulty: self.difficulty,
        };

        let questions = question::generate_questions(
            &engine.generator,
            &engine.prompts,
            &engine.questions,
            &text,
            &request,
        )
        .await?;

        println!("{}", serde_json::to_string_pretty(&questions)?);
        Ok(())
    }
}
