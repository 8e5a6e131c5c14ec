//! Prompt builder for rendering the task templates.
//!
//! All templates are registered once at construction and rendered with
//! Handlebars. Rendering is deterministic: identical inputs always produce
//! identical prompts. List-shaped inputs (chat history, key points, TOC) are
//! pre-rendered to plain text by the helpers at the bottom of this module.

use crate::templates;
use crate::types::{ChatTurn, TocEntry};
use handlebars::Handlebars;
use lectern_core::{AppError, AppResult};
use serde_json::json;

/// Number of trailing chat turns included in a QA prompt. Older turns are
/// dropped first.
pub const HISTORY_TURNS: usize = 6;

/// Deterministic renderer for the five task prompts.
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder with all task templates registered.
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Disable HTML escaping for plain text prompts
        handlebars.register_escape_fn(handlebars::no_escape);

        let entries = [
            ("qa", templates::QA_TEMPLATE),
            ("extractive", templates::EXTRACTIVE_TEMPLATE),
            ("toc", templates::TOC_TEMPLATE),
            ("abstractive", templates::ABSTRACTIVE_TEMPLATE),
            ("mcq", templates::MCQ_TEMPLATE),
            ("tf", templates::TF_TEMPLATE),
        ];

        for (name, template) in entries {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| {
                    AppError::Config(format!("Failed to register template '{}': {}", name, e))
                })?;
        }

        Ok(Self { handlebars })
    }

    fn render(&self, name: &str, variables: &serde_json::Value) -> AppResult<String> {
        tracing::debug!("Rendering prompt template '{}'", name);

        self.handlebars
            .render(name, variables)
            .map_err(|e| AppError::Config(format!("Failed to render template '{}': {}", name, e)))
    }

    /// Build a QA prompt from the question, assembled context, and the last
    /// [`HISTORY_TURNS`] turns of chat history.
    pub fn qa(&self, question: &str, context: &str, history: &[ChatTurn]) -> AppResult<String> {
        self.render(
            "qa",
            &json!({
                "context": context,
                "history": render_history(history),
                "question": question,
            }),
        )
    }

    /// Build an extractive-summary prompt requesting `sentences` key points.
    pub fn extractive(&self, text: &str, sentences: usize) -> AppResult<String> {
        self.render(
            "extractive",
            &json!({
                "sentences": sentences,
                "text": text,
            }),
        )
    }

    /// Build a table-of-contents prompt with the given maximum depth.
    pub fn toc(&self, text: &str, max_level: usize) -> AppResult<String> {
        self.render(
            "toc",
            &json!({
                "max_level": max_level,
                "text": text,
            }),
        )
    }

    /// Build an abstractive-summary prompt over key points and TOC.
    ///
    /// The editor note is mandatory in the template; an absent note renders
    /// as "(none)" so the instruction stays well-formed.
    pub fn abstractive(
        &self,
        key_points: &[String],
        toc: &[TocEntry],
        style: &str,
        editor_note: Option<&str>,
    ) -> AppResult<String> {
        self.render(
            "abstractive",
            &json!({
                "style": style,
                "key_points": render_key_points(key_points),
                "editor_note": editor_note.unwrap_or("(none)"),
                "toc": render_toc(toc),
            }),
        )
    }

    /// Build a multiple-choice question-generation prompt.
    pub fn mcq(&self, text: &str, count: usize, difficulty: u8) -> AppResult<String> {
        self.render(
            "mcq",
            &json!({
                "count": count,
                "text": text,
                "rubric": templates::DIFFICULTY_RUBRIC,
                "difficulty": difficulty,
            }),
        )
    }

    /// Build a True/False question-generation prompt.
    pub fn true_false(&self, text: &str, count: usize, difficulty: u8) -> AppResult<String> {
        self.render(
            "tf",
            &json!({
                "count": count,
                "text": text,
                "rubric": templates::DIFFICULTY_RUBRIC,
                "difficulty": difficulty,
            }),
        )
    }
}

/// Render chat history as role-tagged lines, keeping the last
/// [`HISTORY_TURNS`] turns. Oldest turns are dropped first.
fn render_history(history: &[ChatTurn]) -> String {
    let start = history.len().saturating_sub(HISTORY_TURNS);
    let mut out = String::new();
    for turn in &history[start..] {
        out.push_str(&turn.role.to_uppercase());
        out.push_str(": ");
        out.push_str(&turn.content);
        out.push('\n');
    }
    out
}

/// Render key points as a bulleted list.
fn render_key_points(points: &[String]) -> String {
    points
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render TOC entries as "title: hint" bullets.
fn render_toc(toc: &[TocEntry]) -> String {
    toc.iter()
        .map(|entry| format!("- {}: {}", entry.title, entry.hint))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new().unwrap()
    }

    #[test]
    fn test_qa_prompt_contains_sections() {
        let prompt = builder()
            .qa(
                "What is photosynthesis?",
                "[Doc d1](score=0.812)\nPhotosynthesis text\n",
                &[ChatTurn::user("hi"), ChatTurn::assistant("hello")],
            )
            .unwrap();

        assert!(prompt.contains("RETRIEVED CONTEXT:"));
        assert!(prompt.contains("[Doc d1](score=0.812)"));
        assert!(prompt.contains("USER: hi"));
        assert!(prompt.contains("ASSISTANT: hello"));
        assert!(prompt.contains("QUESTION:\nWhat is photosynthesis?"));
        assert!(prompt.contains("confidence estimate (low/medium/high)"));
    }

    #[test]
    fn test_qa_prompt_deterministic() {
        let b = builder();
        let history = vec![ChatTurn::user("turn")];
        let a = b.qa("q", "ctx", &history).unwrap();
        let c = b.qa("q", "ctx", &history).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_history_keeps_last_six_turns() {
        let history: Vec<ChatTurn> = (0..9).map(|i| ChatTurn::user(format!("turn {}", i))).collect();
        let rendered = render_history(&history);

        // Oldest turns dropped first
        assert!(!rendered.contains("turn 0"));
        assert!(!rendered.contains("turn 2"));
        assert!(rendered.contains("turn 3"));
        assert!(rendered.contains("turn 8"));
        assert_eq!(rendered.lines().count(), HISTORY_TURNS);
    }

    #[test]
    fn test_extractive_prompt_requests_count() {
        let prompt = builder().extractive("lecture text", 8).unwrap();
        assert!(prompt.contains("Extract the 8 most important"));
        assert!(prompt.contains("lecture text"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_toc_prompt_requests_depth() {
        let prompt = builder().toc("lecture text", 3).unwrap();
        assert!(prompt.contains("up to 3 levels"));
        assert!(prompt.contains("\"title\""));
        assert!(prompt.contains("\"hint\""));
    }

    #[test]
    fn test_abstractive_prompt_includes_editor_note() {
        let key_points = vec!["First point".to_string(), "Second point".to_string()];
        let toc = vec![TocEntry {
            title: "Intro".to_string(),
            hint: "Opening material".to_string(),
        }];

        let prompt = builder()
            .abstractive(&key_points, &toc, "concise", Some("shorter please"))
            .unwrap();

        assert!(prompt.contains("write a concise narrative summary"));
        assert!(prompt.contains("- First point"));
        assert!(prompt.contains("- Intro: Opening material"));
        assert!(prompt.contains("EDITOR NOTE: shorter please"));
    }

    #[test]
    fn test_abstractive_prompt_without_feedback() {
        let prompt = builder()
            .abstractive(&["Point".to_string()], &[], "detailed", None)
            .unwrap();
        assert!(prompt.contains("EDITOR NOTE: (none)"));
    }

    #[test]
    fn test_mcq_prompt_embeds_rubric_and_difficulty() {
        let prompt = builder().mcq("source text", 2, 4).unwrap();
        assert!(prompt.contains("2 multiple-choice questions"));
        assert!(prompt.contains("answer_index"));
        assert!(prompt.contains("Difficulty level 5: Expert-level concepts"));
        assert!(prompt.contains("Difficulty level: 4"));
    }

    #[test]
    fn test_tf_prompt_requests_boolean() {
        let prompt = builder().true_false("source text", 3, 1).unwrap();
        assert!(prompt.contains("3 True/False questions"));
        assert!(prompt.contains("\"answer\": true"));
        assert!(prompt.contains("Difficulty level: 1"));
    }
}
