//! Ingest command handler.
//!
//! Indexes documents into the vector store. Accepts a JSON batch file (an
//! array of documents), a single plain-text file, or a directory walked for
//! .txt/.md files. Text extraction from richer formats (PDF, audio) is an
//! external concern; only plain text is ingested here.

use super::build_engine;
use clap::Args;
use lectern_core::{AppConfig, AppError, AppResult};
use lectern_rag::Document;
use std::path::{Path, PathBuf};

/// Index documents into the vector store
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// JSON batch file, text file, or directory of text files
    pub path: PathBuf,

    /// Source label attached to text-file documents (default: file path)
    #[arg(long)]
    pub source: Option<String>,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {:?}", self.path);

        let docs = self.collect_documents()?;
        if docs.is_empty() {
            println!("No documents found at {:?}", self.path);
            return Ok(());
        }

        let engine = build_engine(config)?;
        let mut store = engine.store.lock().await;
        let ids = store.add(docs).await?;

        println!("Indexed {} documents ({} total in store)", ids.len(), store.size());
        for id in ids {
            println!("  {}", id);
        }

        Ok(())
    }

    fn collect_documents(&self) -> AppResult<Vec<Document>> {
        if !self.path.exists() {
            return Err(AppError::Config(format!(
                "Ingest path does not exist: {:?}",
                self.path
            )));
        }

        if self.path.is_dir() {
            return self.collect_from_dir();
        }

        match self.path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let contents = std::fs::read_to_string(&self.path)?;
                let docs: Vec<Document> = serde_json::from_str(&contents)?;
                Ok(docs)
            }
            _ => Ok(vec![self.text_document(&self.path)?]),
        }
    }

    fn collect_from_dir(&self) -> AppResult<Vec<Document>> {
        let mut docs = Vec::new();

        for entry in walkdir::WalkDir::new(&self.path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_text = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("md")
            );
            if entry.file_type().is_file() && is_text {
                docs.push(self.text_document(path)?);
            }
        }

        Ok(docs)
    }

    fn text_document(&self, path: &Path) -> AppResult<Document> {
        let text = std::fs::read_to_string(path)?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let source = self
            .source
            .clone()
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Document {
            id,
            text,
            source,
            meta: serde_json::Map::new(),
        })
    }
}
