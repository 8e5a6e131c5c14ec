//! Prompt construction for the Lectern engine.
//!
//! Five deterministic templates cover the task pipelines: question
//! answering, extractive summary, table of contents, abstractive summary,
//! and question generation (MCQ or True/False). Every template requires the
//! backend to return only the structured payload.

pub mod builder;
pub mod templates;
pub mod types;

// Re-export commonly used types
pub use builder::{PromptBuilder, HISTORY_TURNS};
pub use types::{ChatTurn, TocEntry};
