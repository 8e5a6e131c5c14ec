//! Question-answering orchestration.
//!
//! Pipeline: search → gate → assemble → prompt → generate. A query rejected
//! by the on-topic gate returns a canned redirect with empty sources and
//! never reaches the generation backend.

use crate::config::RagConfig;
use crate::store::VectorStore;
use crate::types::{AnswerArtifact, Retrieval};
use crate::{context, gate};
use lectern_core::AppResult;
use lectern_llm::GenerationClient;
use lectern_prompt::{ChatTurn, PromptBuilder};

/// Canned redirect returned for queries the gate rejects.
pub const OFF_TOPIC_REDIRECT: &str = "I couldn't find relevant material in the indexed course \
content. Please check the course materials or ask a more specific question about the covered \
topics.";

/// Default number of hits retrieved per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Answer a query against the indexed corpus.
///
/// Collects up to `max_context_chunks` source document ids plus a
/// per-hit `(score, doc_id, source)` retrieval record for each of the `k`
/// retrieved hits.
pub async fn answer(
    store: &VectorStore,
    generator: &GenerationClient,
    prompts: &PromptBuilder,
    config: &RagConfig,
    query: &str,
    history: &[ChatTurn],
    k: usize,
) -> AppResult<AnswerArtifact> {
    tracing::info!("Received QA request: {}", query);

    let hits = store.search(query, k).await?;

    if !gate::admit(&hits, config.similarity_threshold) {
        tracing::info!(
            "Query rejected by on-topic gate (top score {:?}, threshold {})",
            hits.first().map(|hit| hit.score),
            config.similarity_threshold
        );
        return Ok(AnswerArtifact {
            on_topic: false,
            answer: None,
            redirect: Some(OFF_TOPIC_REDIRECT.to_string()),
            sources: Vec::new(),
            retrievals: Vec::new(),
        });
    }

    let context = context::assemble(&hits, config.max_context_chunks, config.snippet_char_cap);
    let prompt = prompts.qa(query, &context, history)?;
    let answer = generator.generate(&prompt).await?;

    let sources = hits
        .iter()
        .take(config.max_context_chunks)
        .map(|hit| hit.document.doc_id.clone())
        .collect();

    let retrievals = hits
        .iter()
        .map(|hit| Retrieval {
            score: hit.score,
            doc_id: hit.document.doc_id.clone(),
            source: hit.document.source.clone(),
        })
        .collect();

    tracing::info!("QA response: on_topic=true");

    Ok(AnswerArtifact {
        on_topic: true,
        answer: Some(answer.trim().to_string()),
        redirect: None,
        sources,
        retrievals,
    })
}
