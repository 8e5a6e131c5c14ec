//! Pipeline scenarios: QA gating, question generation, summarization
//! failure handling, and generation retry behavior.

use super::{PlannedEmbedder, ScriptedBackend};
use crate::config::RagConfig;
use crate::question::{self, QuestionRequest};
use crate::repo::Repository;
use crate::store::VectorStore;
use crate::summary::{self, SummaryOptions};
use crate::types::{Document, QuestionAnswer, QuestionArtifact, QuestionKind, SummaryArtifact};
use crate::qa;
use lectern_core::AppError;
use lectern_llm::GenerationClient;
use lectern_prompt::PromptBuilder;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn generator(backend: Arc<ScriptedBackend>) -> GenerationClient {
    GenerationClient::new(backend, "mistral").with_backoff(Duration::from_millis(1))
}

fn doc(id: &str, text: &str, source: &str) -> Document {
    Document {
        id: id.to_string(),
        text: text.to_string(),
        source: source.to_string(),
        meta: serde_json::Map::new(),
    }
}

fn photosynthesis_store(workspace: &Path) -> (RagConfig, VectorStore) {
    let config = RagConfig::for_workspace(workspace, 3);
    let embedder = PlannedEmbedder::new(3)
        .plan("Photosynthesis converts light to energy.", vec![1.0, 0.0, 0.0])
        .plan("How does photosynthesis work?", vec![0.8, 0.6, 0.0])
        .plan("What year did the French Revolution start?", vec![0.0, 0.1, 0.9]);
    let store = VectorStore::open(&config, Arc::new(embedder));
    (config, store)
}

#[tokio::test]
async fn scenario_empty_store_redirects_without_generation() {
    let temp = TempDir::new().unwrap();
    let config = RagConfig::for_workspace(temp.path(), 3);
    let store = VectorStore::open(&config, Arc::new(PlannedEmbedder::new(3)));

    let hits = store.search("anything", 5).await.unwrap();
    assert!(hits.is_empty());

    let backend = Arc::new(ScriptedBackend::succeeding(&["should never be used"]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    let artifact = qa::answer(&store, &client, &prompts, &config, "anything", &[], 5)
        .await
        .unwrap();

    assert!(!artifact.on_topic);
    assert!(artifact.answer.is_none());
    assert!(!artifact.redirect.unwrap().is_empty());
    assert!(artifact.sources.is_empty());
    assert!(artifact.retrievals.is_empty());
    // No generation call is made for rejected queries
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn scenario_indexed_document_found_above_threshold() {
    let temp = TempDir::new().unwrap();
    let (_, mut store) = photosynthesis_store(temp.path());

    store
        .add(vec![doc("doc1", "Photosynthesis converts light to energy.", "bio")])
        .await
        .unwrap();

    let hits = store
        .search("How does photosynthesis work?", 1)
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document.doc_id, "doc1");
    assert!(hits[0].score > 0.55);
}

#[tokio::test]
async fn scenario_on_topic_answer_with_sources_and_retrievals() {
    let temp = TempDir::new().unwrap();
    let (config, mut store) = photosynthesis_store(temp.path());

    store
        .add(vec![doc("doc1", "Photosynthesis converts light to energy.", "bio")])
        .await
        .unwrap();

    let backend = Arc::new(ScriptedBackend::succeeding(&[
        "  Photosynthesis converts light into chemical energy [Doc doc1]. Confidence: high  ",
    ]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    let artifact = qa::answer(
        &store,
        &client,
        &prompts,
        &config,
        "How does photosynthesis work?",
        &[],
        5,
    )
    .await
    .unwrap();

    assert!(artifact.on_topic);
    assert!(artifact.redirect.is_none());
    // Generated text is trimmed
    let answer = artifact.answer.unwrap();
    assert!(answer.starts_with("Photosynthesis"));
    assert!(answer.ends_with("high"));

    assert_eq!(artifact.sources, vec!["doc1"]);
    assert_eq!(artifact.retrievals.len(), 1);
    assert_eq!(artifact.retrievals[0].doc_id, "doc1");
    assert_eq!(artifact.retrievals[0].source, "bio");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn scenario_off_topic_query_rejected_by_gate() {
    let temp = TempDir::new().unwrap();
    let (config, mut store) = photosynthesis_store(temp.path());

    store
        .add(vec![doc("doc1", "Photosynthesis converts light to energy.", "bio")])
        .await
        .unwrap();

    let backend = Arc::new(ScriptedBackend::succeeding(&["unused"]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    // Low similarity: score 0.0*1.0 + 0.1*0.0 + ... = 0.0 < 0.55
    let artifact = qa::answer(
        &store,
        &client,
        &prompts,
        &config,
        "What year did the French Revolution start?",
        &[],
        5,
    )
    .await
    .unwrap();

    assert!(!artifact.on_topic);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn scenario_mcq_generation_persists_batch() {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("questions.json");
    let repo: Repository<QuestionArtifact> = Repository::with_store_file(store_path.clone());

    let raw = r#"{"Question": [
        {
            "question": "Where does photosynthesis occur?",
            "options": ["Nucleus", "Mitochondria", "Chloroplast", "Ribosome"],
            "answer_index": 2,
            "rationale": "Chloroplasts contain chlorophyll."
        },
        {
            "question": "What pigment absorbs light?",
            "options": ["Chlorophyll", "Keratin", "Melanin", "Hemoglobin"],
            "answer_index": 0,
            "rationale": "Chlorophyll absorbs red and blue light."
        }
    ]}"#;

    let backend = Arc::new(ScriptedBackend::succeeding(&[raw]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    let request = QuestionRequest {
        source: Some("bio".to_string()),
        kind: QuestionKind::Mcq,
        count: 2,
        difficulty: 4,
    };

    let questions = question::generate_questions(&client, &prompts, &repo, "lecture text", &request)
        .await
        .unwrap();

    assert_eq!(questions.len(), 2);

    // Fresh unique identifiers
    assert!(!questions[0].id.is_empty());
    assert_ne!(questions[0].id, questions[1].id);

    // The stored answer is the full selected option object
    match &questions[0].answer {
        QuestionAnswer::Choice(option) => {
            assert_eq!(option.id, 2);
            assert_eq!(option.option, "Chloroplast");
        }
        QuestionAnswer::Bool(_) => panic!("MCQ answer must be an option object"),
    }

    for q in &questions {
        assert_eq!(q.difficulty, 4);
        assert_eq!(q.kind, QuestionKind::Mcq);
        assert_eq!(q.source.as_deref(), Some("bio"));
        assert_eq!(q.options.as_ref().unwrap().len(), 4);
    }

    // The full store was rewritten to disk after the batch
    assert_eq!(repo.len(), 2);
    let on_disk: HashMap<String, QuestionArtifact> =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 2);
    assert!(on_disk.contains_key(&questions[0].id));
}

#[tokio::test]
async fn scenario_tf_generation() {
    let repo: Repository<QuestionArtifact> = Repository::in_memory();

    let raw = r#"{"Question": [
        {"question": "Photosynthesis produces oxygen.", "answer": true, "rationale": "Oxygen is a byproduct."}
    ]}"#;

    let backend = Arc::new(ScriptedBackend::succeeding(&[raw]));
    let client = generator(backend);
    let prompts = PromptBuilder::new().unwrap();

    let request = QuestionRequest::new(QuestionKind::Tf);
    let questions = question::generate_questions(&client, &prompts, &repo, "text", &request)
        .await
        .unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].answer, QuestionAnswer::Bool(true));
    assert!(questions[0].options.is_none());
    assert_eq!(questions[0].difficulty, 2);
}

#[tokio::test]
async fn scenario_invalid_difficulty_rejected_before_generation() {
    let repo: Repository<QuestionArtifact> = Repository::in_memory();
    let backend = Arc::new(ScriptedBackend::succeeding(&["unused"]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    let mut request = QuestionRequest::new(QuestionKind::Mcq);
    request.difficulty = 0;

    let err = question::generate_questions(&client, &prompts, &repo, "text", &request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnsupportedInput(_)));
    assert_eq!(backend.call_count(), 0);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn scenario_malformed_output_persists_nothing() {
    let repo: Repository<SummaryArtifact> = Repository::in_memory();

    let backend = Arc::new(ScriptedBackend::succeeding(&[
        "Sure! Here are the key points you asked for.",
    ]));
    let client = generator(backend);
    let prompts = PromptBuilder::new().unwrap();

    let err = summary::create_summary(&client, &prompts, &repo, "lecture text", SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MalformedOutput(_)));
    assert!(repo.is_empty());
}

#[tokio::test]
async fn scenario_summary_pipeline_persists_artifact() {
    let repo: Repository<SummaryArtifact> = Repository::in_memory();

    let backend = Arc::new(ScriptedBackend::succeeding(&[
        r#"["Light reactions split water.", "The Calvin cycle fixes carbon."]"#,
        r#"[{"title": "Light reactions", "hint": "Water splitting and ATP."}, {"title": "Calvin cycle"}]"#,
        "  Photosynthesis proceeds in two stages: light reactions and the Calvin cycle.  ",
    ]));
    let client = generator(backend.clone());
    let prompts = PromptBuilder::new().unwrap();

    let options = SummaryOptions {
        summary_id: Some("sum-1".to_string()),
        source: Some("bio-lecture-3".to_string()),
        extractive_sentences: 8,
        feedback: Some("Keep it beginner friendly".to_string()),
        ..Default::default()
    };

    let artifact = summary::create_summary(&client, &prompts, &repo, "lecture text", options)
        .await
        .unwrap();

    assert_eq!(artifact.id, "sum-1");
    assert_eq!(artifact.source.as_deref(), Some("bio-lecture-3"));

    // Stored extractive list excludes the editor-note bullet
    assert_eq!(artifact.extractive.len(), 2);
    assert!(artifact.extractive.iter().all(|p| !p.contains("EDITOR NOTE")));

    assert_eq!(artifact.toc.len(), 2);
    assert_eq!(artifact.toc[1].hint, "");
    assert!(artifact.abstract_text.starts_with("Photosynthesis"));
    assert_eq!(artifact.comments.as_deref(), Some("Keep it beginner friendly"));

    // Extractive, TOC and abstractive each cost one generation call
    assert_eq!(backend.call_count(), 3);
    assert!(repo.get("sum-1").is_some());
}

#[tokio::test]
async fn scenario_generation_recovers_within_retry_budget() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Err("connection refused".to_string()),
        Err("connection refused".to_string()),
        Ok("third time lucky".to_string()),
    ]));

    let client = GenerationClient::new(backend.clone(), "mistral")
        .with_max_retries(2)
        .with_backoff(Duration::from_millis(1));

    let text = client.generate("prompt").await.unwrap();
    assert_eq!(text, "third time lucky");
    assert_eq!(backend.call_count(), 3);
}
