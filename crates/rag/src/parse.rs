//! Strict parsing and validation of generated output.
//!
//! Generated text is the most fragile boundary in the engine: the backend is
//! asked for bare JSON but is free to return anything. Each task has its own
//! expected shape; text that is not valid JSON or violates the shape fails
//! with `MalformedOutput`, propagated unmodified to the caller. There are no
//! partial results and no auto-repair.

use crate::types::{QuestionAnswer, QuestionKind, QuestionOption};
use lectern_core::{AppError, AppResult};
use lectern_prompt::TocEntry;
use serde::Deserialize;
use serde_json::Value;

/// Parse an extractive-summary response: a JSON array of strings.
///
/// The array is truncated to the requested count; non-string elements are
/// stringified rather than rejected.
pub fn parse_extractive(raw: &str, requested: usize) -> AppResult<Vec<String>> {
    let values: Vec<Value> = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::MalformedOutput(format!("Expected a JSON array of strings: {}", e))
    })?;

    Ok(values
        .into_iter()
        .take(requested)
        .map(|value| match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect())
}

/// Parse a table-of-contents response: a JSON array of {title, hint}.
///
/// A missing `hint` defaults to the empty string; a missing or non-string
/// `title` is a schema violation.
pub fn parse_toc(raw: &str) -> AppResult<Vec<TocEntry>> {
    let values: Vec<Value> = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::MalformedOutput(format!("Expected a JSON array of TOC objects: {}", e))
    })?;

    values
        .into_iter()
        .map(|item| {
            let obj = item.as_object().ok_or_else(|| {
                AppError::MalformedOutput("TOC item is not an object".to_string())
            })?;

            let title = obj.get("title").and_then(Value::as_str).ok_or_else(|| {
                AppError::MalformedOutput("TOC item missing string 'title'".to_string())
            })?;

            let hint = obj.get("hint").and_then(Value::as_str).unwrap_or("");

            Ok(TocEntry {
                title: title.to_string(),
                hint: hint.to_string(),
            })
        })
        .collect()
}

/// Envelope shape for question generation: {"Question": [...]}.
#[derive(Debug, Deserialize)]
struct QuestionEnvelope {
    #[serde(rename = "Question")]
    questions: Vec<RawQuestion>,
}

/// A single generated question before validation.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: String,

    #[serde(default)]
    options: Option<Vec<String>>,

    #[serde(default)]
    answer_index: Option<usize>,

    #[serde(default)]
    answer: Option<bool>,

    #[serde(default)]
    rationale: String,
}

/// A validated question, not yet assigned an identifier.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Option<Vec<QuestionOption>>,
    pub answer: QuestionAnswer,
    pub rationale: String,
}

/// Parse a question-generation response for the given kind.
///
/// MCQ items build a zero-based option list; `answer_index` defaults to 0
/// and selects the option. The stored answer is the full selected option
/// object, not the bare index. TF items carry a boolean `answer` defaulting
/// to `false`.
pub fn parse_questions(raw: &str, kind: QuestionKind) -> AppResult<Vec<QuestionDraft>> {
    let envelope: QuestionEnvelope = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::MalformedOutput(format!("Expected {{\"Question\": [...]}}: {}", e))
    })?;

    envelope
        .questions
        .into_iter()
        .map(|item| build_draft(item, kind))
        .collect()
}

fn build_draft(item: RawQuestion, kind: QuestionKind) -> AppResult<QuestionDraft> {
    match kind {
        QuestionKind::Mcq => {
            let raw_options = item
                .options
                .filter(|options| !options.is_empty())
                .ok_or_else(|| {
                    AppError::MalformedOutput("MCQ item missing 'options'".to_string())
                })?;

            let options: Vec<QuestionOption> = raw_options
                .into_iter()
                .enumerate()
                .map(|(id, option)| QuestionOption { id, option })
                .collect();

            let index = item.answer_index.unwrap_or(0);
            let selected = options.get(index).cloned().ok_or_else(|| {
                AppError::MalformedOutput(format!(
                    "answer_index {} out of range for {} options",
                    index,
                    options.len()
                ))
            })?;

            Ok(QuestionDraft {
                question: item.question,
                options: Some(options),
                answer: QuestionAnswer::Choice(selected),
                rationale: item.rationale,
            })
        }

        QuestionKind::Tf => Ok(QuestionDraft {
            question: item.question,
            options: None,
            answer: QuestionAnswer::Bool(item.answer.unwrap_or(false)),
            rationale: item.rationale,
        }),
    }
}
