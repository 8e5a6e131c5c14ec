//! Quiz question generation orchestration.
//!
//! Selects the MCQ or TF template per requested kind, delegates to
//! generation and parsing, assigns fresh identifiers and persists the batch
//! with a single whole-file rewrite. Invalid requests are rejected at the
//! boundary; the backend is never called for them.

use crate::parse;
use crate::repo::Repository;
use crate::types::{QuestionArtifact, QuestionKind};
use lectern_core::{AppError, AppResult};
use lectern_llm::GenerationClient;
use lectern_prompt::PromptBuilder;

/// A question-generation request.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    /// Source identifier attached to every generated question
    pub source: Option<String>,

    /// Question flavor
    pub kind: QuestionKind,

    /// Number of questions to request
    pub count: usize,

    /// Requested difficulty, 1-5
    pub difficulty: u8,
}

impl QuestionRequest {
    /// Create a request with the default count (3) and difficulty (2).
    pub fn new(kind: QuestionKind) -> Self {
        Self {
            source: None,
            kind,
            count: 3,
            difficulty: 2,
        }
    }
}

/// Generate quiz questions from text.
///
/// Every produced question receives a freshly generated unique identifier
/// and is written into the repository; the full store file is rewritten
/// once per batch.
pub async fn generate_questions(
    generator: &GenerationClient,
    prompts: &PromptBuilder,
    repo: &Repository<QuestionArtifact>,
    text: &str,
    request: &QuestionRequest,
) -> AppResult<Vec<QuestionArtifact>> {
    if !(1..=5).contains(&request.difficulty) {
        return Err(AppError::UnsupportedInput(format!(
            "Difficulty must lie in 1-5, got {}",
            request.difficulty
        )));
    }

    let prompt = match request.kind {
        QuestionKind::Mcq => prompts.mcq(text, request.count, request.difficulty)?,
        QuestionKind::Tf => prompts.true_false(text, request.count, request.difficulty)?,
    };

    let raw = generator.generate(&prompt).await?;
    let drafts = parse::parse_questions(&raw, request.kind)?;

    let artifacts: Vec<QuestionArtifact> = drafts
        .into_iter()
        .map(|draft| QuestionArtifact {
            id: uuid::Uuid::new_v4().to_string(),
            source: request.source.clone(),
            kind: request.kind,
            question: draft.question,
            options: draft.options,
            answer: draft.answer,
            difficulty: request.difficulty,
            rationale: draft.rationale,
        })
        .collect();

    repo.put_all(artifacts.iter().map(|q| (q.id.clone(), q.clone())));

    tracing::info!(
        "Generated {} {} questions",
        artifacts.len(),
        request.kind.as_str()
    );

    Ok(artifacts)
}
