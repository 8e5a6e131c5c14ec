//! Retrieval engine type definitions.

use lectern_core::AppError;
use lectern_prompt::TocEntry;
use serde::{Deserialize, Serialize};

/// A caller-supplied document to index. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Caller-supplied identifier. Not assumed unique across add calls;
    /// re-adding an id creates a second, independent slot.
    pub id: String,

    /// Full document text
    pub text: String,

    /// Source identifier (filename, URL, course unit)
    #[serde(default)]
    pub source: String,

    /// Free-form metadata
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// Snapshot of a document stored alongside its vector slot.
///
/// Slots are positional: the metadata table is keyed by append order, and
/// the caller id survives only as the `doc_id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Caller-supplied document id
    pub doc_id: String,

    /// Source identifier
    #[serde(default)]
    pub source: String,

    /// Full document text
    pub text: String,

    /// Free-form metadata
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl From<Document> for DocRecord {
    fn from(doc: Document) -> Self {
        Self {
            doc_id: doc.id,
            source: doc.source,
            text: doc.text,
            meta: doc.meta,
        }
    }
}

/// A single similarity-search result.
///
/// `score` is the inner product of two unit vectors (cosine similarity).
/// Hits are ordered by descending score; ties break by ascending slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Cosine similarity of the query and the stored vector
    pub score: f32,

    /// Positional slot of the stored vector
    pub slot: usize,

    /// Document snapshot stored at the slot
    pub document: DocRecord,
}

/// Per-hit retrieval record attached to QA answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieval {
    /// Similarity score
    pub score: f32,

    /// Caller-supplied document id
    pub doc_id: String,

    /// Source identifier
    pub source: String,
}

/// Result of a question-answering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerArtifact {
    /// Whether the query passed the on-topic gate
    pub on_topic: bool,

    /// Generated answer (present when on topic)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Canned redirect (present when off topic)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    /// Document ids of the context chunks used for the answer
    pub sources: Vec<String>,

    /// Per-hit retrieval records, up to the requested k
    pub retrievals: Vec<Retrieval>,
}

/// Result of a summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryArtifact {
    /// Summary identifier (caller-supplied or freshly generated)
    pub id: String,

    /// Source identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Generated table of contents
    pub toc: Vec<TocEntry>,

    /// Extracted key points (without the editor-note bullet)
    pub extractive: Vec<String>,

    /// Abstractive narrative summary
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Caller feedback carried into the editor note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Question flavor. Exactly one flavor per generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice, four options
    Mcq,
    /// True/False
    Tf,
}

impl QuestionKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Tf => "tf",
        }
    }
}

impl std::str::FromStr for QuestionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(QuestionKind::Mcq),
            "tf" => Ok(QuestionKind::Tf),
            other => Err(AppError::UnsupportedInput(format!(
                "Unknown question type: '{}'. Supported: mcq, tf",
                other
            ))),
        }
    }
}

/// A single MCQ option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Zero-based option index
    pub id: usize,

    /// Option text
    pub option: String,
}

/// The stored answer: the full selected option object for MCQ, a boolean
/// for True/False.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionAnswer {
    Choice(QuestionOption),
    Bool(bool),
}

/// A generated quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionArtifact {
    /// Freshly generated unique identifier
    pub id: String,

    /// Source identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Question flavor
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Question text
    pub question: String,

    /// MCQ options; absent for True/False
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,

    /// Correct answer
    pub answer: QuestionAnswer,

    /// Requested difficulty, 1-5
    pub difficulty: u8,

    /// Explanation for the answer
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_question_kind_parse() {
        assert_eq!(QuestionKind::from_str("mcq").unwrap(), QuestionKind::Mcq);
        assert_eq!(QuestionKind::from_str("tf").unwrap(), QuestionKind::Tf);
        assert!(QuestionKind::from_str("essay").is_err());
    }

    #[test]
    fn test_doc_record_from_document() {
        let doc = Document {
            id: "doc1".to_string(),
            text: "text".to_string(),
            source: "bio".to_string(),
            meta: serde_json::Map::new(),
        };

        let record = DocRecord::from(doc);
        assert_eq!(record.doc_id, "doc1");
        assert_eq!(record.source, "bio");
    }

    #[test]
    fn test_answer_serialization_shapes() {
        let choice = QuestionAnswer::Choice(QuestionOption {
            id: 2,
            option: "Chloroplast".to_string(),
        });
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["option"], "Chloroplast");

        let boolean = QuestionAnswer::Bool(true);
        assert_eq!(serde_json::to_value(&boolean).unwrap(), true);
    }

    #[test]
    fn test_summary_abstract_field_name() {
        let artifact = SummaryArtifact {
            id: "s1".to_string(),
            source: None,
            toc: vec![],
            extractive: vec![],
            abstract_text: "summary".to_string(),
            comments: None,
        };

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["abstract"], "summary");
    }
}
