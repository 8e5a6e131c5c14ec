//! Summarization orchestration.
//!
//! Pipeline: extractive key points → editor-note bullet → table of contents
//! → abstractive narrative → persist. Any parse failure aborts the run
//! before anything is stored.

use crate::repo::Repository;
use crate::types::SummaryArtifact;
use crate::parse;
use lectern_core::AppResult;
use lectern_llm::GenerationClient;
use lectern_prompt::PromptBuilder;

/// Options for a summarization run.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Summary identifier; a fresh UUID is generated when absent
    pub summary_id: Option<String>,

    /// Source identifier (filename/url)
    pub source: Option<String>,

    /// Maximum TOC depth
    pub toc_levels: usize,

    /// Number of key sentences for the extractive step
    pub extractive_sentences: usize,

    /// Tone for the abstractive summary (e.g. "concise", "detailed")
    pub style: String,

    /// Caller feedback carried into the editor note
    pub feedback: Option<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            summary_id: None,
            source: None,
            toc_levels: 3,
            extractive_sentences: 8,
            style: "concise".to_string(),
            feedback: None,
        }
    }
}

/// Create a summary of the text using extractive and abstractive passes.
///
/// The editor-note bullet derived from caller feedback is appended to the
/// key points handed to the abstractive pass only; the persisted
/// `extractive` list holds the original key points.
pub async fn create_summary(
    generator: &GenerationClient,
    prompts: &PromptBuilder,
    repo: &Repository<SummaryArtifact>,
    text: &str,
    options: SummaryOptions,
) -> AppResult<SummaryArtifact> {
    let id = options
        .summary_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!("Creating summary {} for source {:?}", id, options.source);

    let raw = generator
        .generate(&prompts.extractive(text, options.extractive_sentences)?)
        .await?;
    let key_points = parse::parse_extractive(&raw, options.extractive_sentences)?;

    let feedback = options.feedback.as_deref();
    let mut enhanced = key_points.clone();
    enhanced.push(format!("EDITOR NOTE: {}", feedback.unwrap_or("(none)")));

    let raw = generator
        .generate(&prompts.toc(text, options.toc_levels)?)
        .await?;
    let toc = parse::parse_toc(&raw)?;

    let abstract_prompt = prompts.abstractive(&enhanced, &toc, &options.style, feedback)?;
    let abstract_text = generator.generate(&abstract_prompt).await?.trim().to_string();

    let artifact = SummaryArtifact {
        id: id.clone(),
        source: options.source.clone(),
        toc,
        extractive: key_points,
        abstract_text,
        comments: options.feedback.clone(),
    };

    repo.put(id, artifact.clone());

    Ok(artifact)
}
