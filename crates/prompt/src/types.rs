//! Prompt input types shared across the task pipelines.

use serde::{Deserialize, Serialize};

/// A single turn of question-answering chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker role ("user" or "assistant")
    pub role: String,

    /// Turn text
    pub content: String,
}

impl ChatTurn {
    /// Create a chat turn with an explicit role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// One entry of a generated table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Section title
    pub title: String,

    /// 1-2 sentence summary of the section
    #[serde(default)]
    pub hint: String,
}
