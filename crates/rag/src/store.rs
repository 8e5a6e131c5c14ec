//! Persistent vector store with exact inner-product search.
//!
//! The store is append-only: each added document is embedded, L2-normalized
//! and appended at the next positional slot, with a document snapshot stored
//! in a slot-keyed side table. Every successful add rewrites both persisted
//! files in full. Loading is forgiving: any
//! structural problem in the persisted files logs a warning and falls back
//! to a fresh empty index.
//!
//! The store itself carries no locking. Callers share it through
//! [`SharedVectorStore`]; concurrent writers are out of scope (single-writer
//! invariant, see DESIGN.md).

use crate::config::RagConfig;
use crate::embeddings::EmbeddingProvider;
use crate::types::{DocRecord, Document, SearchHit};
use lectern_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Magic bytes identifying the index file format.
const INDEX_MAGIC: &[u8; 4] = b"LVEC";

/// Shared handle imposing the engine's mutual-exclusion discipline: one
/// writer at a time, readers never observe a half-written state.
pub type SharedVectorStore = Arc<tokio::sync::Mutex<VectorStore>>;

/// Append-only embedding index with slot-keyed metadata.
pub struct VectorStore {
    dim: usize,
    vectors: Vec<Vec<f32>>,
    metadata: BTreeMap<usize, DocRecord>,
    index_path: PathBuf,
    metadata_path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorStore {
    /// Open the store, loading persisted files if present and structurally
    /// valid. Never fails: on any load error a fresh empty index of the
    /// configured dimension is used instead.
    pub fn open(config: &RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let (vectors, metadata) =
            match load_persisted(&config.index_path, &config.metadata_path, config.embedding_dim) {
                Ok(Some((vectors, metadata))) => {
                    tracing::info!(
                        "Loaded vector index from {:?} ({} entries)",
                        config.index_path,
                        vectors.len()
                    );
                    (vectors, metadata)
                }
                Ok(None) => {
                    tracing::info!(
                        "No persisted index at {:?}; starting empty (dim {})",
                        config.index_path,
                        config.embedding_dim
                    );
                    (Vec::new(), BTreeMap::new())
                }
                Err(e) => {
                    tracing::warn!("Failed to load persisted index: {}. Starting empty.", e);
                    (Vec::new(), BTreeMap::new())
                }
            };

        Self {
            dim: config.embedding_dim,
            vectors,
            metadata,
            index_path: config.index_path.clone(),
            metadata_path: config.metadata_path.clone(),
            embedder,
        }
    }

    /// Wrap the store in its shared handle.
    pub fn into_shared(self) -> SharedVectorStore {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// Number of stored vectors (== number of slots).
    pub fn size(&self) -> usize {
        self.vectors.len()
    }

    /// Add documents to the index.
    ///
    /// All texts are embedded in one batch call, normalized, and appended in
    /// input order; metadata is keyed by the resulting slot. Embedding
    /// failure is fatal and leaves the store unchanged. Persistence failure
    /// is logged but non-fatal; the in-memory index remains usable.
    ///
    /// Returns the caller-supplied ids in input order. Re-adding an id
    /// creates a second, independent slot, not an upsert.
    pub async fn add(&mut self, docs: Vec<Document>) -> AppResult<Vec<String>> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();
        let mut embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| AppError::Ingestion(format!("Embedding batch failed: {}", e)))?;

        if embeddings.len() != docs.len() {
            return Err(AppError::Ingestion(format!(
                "Embedding backend returned {} vectors for {} documents",
                embeddings.len(),
                docs.len()
            )));
        }

        // Validate every vector before touching the index: no partial add.
        for embedding in &embeddings {
            if embedding.len() != self.dim {
                return Err(AppError::Ingestion(format!(
                    "Embedding dimension mismatch: got {}, expected {}",
                    embedding.len(),
                    self.dim
                )));
            }
        }

        for embedding in &mut embeddings {
            normalize(embedding);
        }

        let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();

        for (embedding, doc) in embeddings.into_iter().zip(docs) {
            let slot = self.vectors.len();
            self.vectors.push(embedding);
            self.metadata.insert(slot, DocRecord::from(doc));
        }

        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist index: {}", e);
        }

        tracing::info!("Added {} documents to index", ids.len());
        Ok(ids)
    }

    /// Search for the top-k most similar documents.
    ///
    /// The query is embedded and normalized, then scored by exact inner
    /// product against every stored vector. Results are ordered by
    /// descending score with ties broken by ascending slot. An empty store
    /// yields an empty result; `k` larger than the store returns everything.
    /// `k` is clamped to at least 1.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<Vec<SearchHit>> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let k = k.max(1);

        let mut query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| AppError::Ingestion(format!("Query embedding failed: {}", e)))?;

        if query_embedding.len() != self.dim {
            return Err(AppError::Ingestion(format!(
                "Query embedding dimension mismatch: got {}, expected {}",
                query_embedding.len(),
                self.dim
            )));
        }

        normalize(&mut query_embedding);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(slot, vector)| (slot, dot(&query_embedding, vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);

        let mut hits = Vec::with_capacity(scored.len());
        for (slot, score) in scored {
            let document = self.metadata.get(&slot).cloned().ok_or_else(|| {
                AppError::Persistence(format!("Metadata missing for slot {}", slot))
            })?;
            hits.push(SearchHit {
                score,
                slot,
                document,
            });
        }

        tracing::debug!("Search returned {} hits (requested top-{})", hits.len(), k);
        Ok(hits)
    }

    /// Rewrite both persisted files in full.
    fn persist(&self) -> AppResult<()> {
        if let Some(parent) = self.index_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Persistence(format!("Failed to create index directory: {}", e))
            })?;
        }

        let mut bytes = Vec::with_capacity(12 + self.vectors.len() * self.dim * 4);
        bytes.extend_from_slice(INDEX_MAGIC);
        bytes.extend_from_slice(&(self.dim as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.vectors.len() as u32).to_le_bytes());
        for vector in &self.vectors {
            for value in vector {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }

        std::fs::write(&self.index_path, bytes).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to write index to {:?}: {}",
                self.index_path, e
            ))
        })?;

        let keyed: BTreeMap<String, &DocRecord> = self
            .metadata
            .iter()
            .map(|(slot, record)| (slot.to_string(), record))
            .collect();
        let json = serde_json::to_string_pretty(&keyed)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize metadata: {}", e)))?;

        std::fs::write(&self.metadata_path, json).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to write metadata to {:?}: {}",
                self.metadata_path, e
            ))
        })?;

        tracing::debug!("Persisted index and metadata ({} entries)", self.size());
        Ok(())
    }
}

/// Load both persisted files if present, validating structure.
///
/// Returns `Ok(None)` when either file is missing; any structural problem is
/// an error the caller downgrades to a fresh start.
#[allow(clippy::type_complexity)]
fn load_persisted(
    index_path: &Path,
    metadata_path: &Path,
    expected_dim: usize,
) -> AppResult<Option<(Vec<Vec<f32>>, BTreeMap<usize, DocRecord>)>> {
    if !index_path.exists() || !metadata_path.exists() {
        return Ok(None);
    }

    let bytes = std::fs::read(index_path)?;
    if bytes.len() < 12 || &bytes[0..4] != INDEX_MAGIC {
        return Err(AppError::Persistence(format!(
            "Index file {:?} has an invalid header",
            index_path
        )));
    }

    let dim = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;

    if dim != expected_dim {
        return Err(AppError::Persistence(format!(
            "Index dimension {} does not match configured dimension {}",
            dim, expected_dim
        )));
    }

    let payload = &bytes[12..];
    if payload.len() != dim * count * 4 {
        return Err(AppError::Persistence(format!(
            "Index file {:?} is truncated: expected {} payload bytes, found {}",
            index_path,
            dim * count * 4,
            payload.len()
        )));
    }

    let mut vectors = Vec::with_capacity(count);
    for chunk in payload.chunks_exact(dim * 4) {
        let vector: Vec<f32> = chunk
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        vectors.push(vector);
    }

    let contents = std::fs::read_to_string(metadata_path)?;
    let keyed: BTreeMap<String, DocRecord> = serde_json::from_str(&contents)
        .map_err(|e| AppError::Persistence(format!("Failed to parse metadata file: {}", e)))?;

    let mut metadata = BTreeMap::new();
    for (key, record) in keyed {
        let slot: usize = key.parse().map_err(|_| {
            AppError::Persistence(format!("Metadata key '{}' is not a slot index", key))
        })?;
        metadata.insert(slot, record);
    }

    // Coverage must match valid slots exactly: 1:1, no gaps.
    let coverage_ok =
        metadata.len() == count && metadata.keys().enumerate().all(|(i, &slot)| i == slot);
    if !coverage_ok {
        return Err(AppError::Persistence(format!(
            "Metadata covers {} slots but index holds {} vectors",
            metadata.len(),
            count
        )));
    }

    Ok(Some((vectors, metadata)))
}

/// L2-normalize a vector in place. Zero vectors are left as-is rather than
/// divided by zero.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Inner product of two equal-length vectors.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
