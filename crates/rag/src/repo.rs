//! Keyed artifact repositories.
//!
//! A [`Repository`] is an in-memory map behind a mutex, optionally mirrored
//! to a single JSON file that is rewritten in full after each mutation.
//! There are no transactional guarantees: persistence failures are logged
//! and swallowed, and a failed load starts the repository empty.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Mutex-guarded keyed store with optional whole-file JSON mirroring.
pub struct Repository<T> {
    entries: Mutex<HashMap<String, T>>,
    store_file: Option<PathBuf>,
}

impl<T: Clone + Serialize + DeserializeOwned> Repository<T> {
    /// Create a purely in-memory repository.
    pub fn in_memory() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            store_file: None,
        }
    }

    /// Create a repository mirrored to `path`, loading existing contents if
    /// the file is present. Load failures are logged and ignored.
    pub fn with_store_file(path: PathBuf) -> Self {
        let mut entries = HashMap::new();

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<HashMap<String, T>>(&contents) {
                    Ok(loaded) => {
                        tracing::debug!("Loaded {} entries from {:?}", loaded.len(), path);
                        entries = loaded;
                    }
                    Err(e) => tracing::warn!("Could not parse store file {:?}: {}", path, e),
                },
                Err(e) => tracing::warn!("Could not read store file {:?}: {}", path, e),
            }
        }

        Self {
            entries: Mutex::new(entries),
            store_file: Some(path),
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    /// Insert or replace one entry, then rewrite the store file.
    pub fn put(&self, id: String, value: T) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(id, value);
        self.persist(&entries);
    }

    /// Insert a batch of entries with a single store-file rewrite.
    pub fn put_all(&self, items: impl IntoIterator<Item = (String, T)>) {
        let mut entries = self.entries.lock().unwrap();
        for (id, value) in items {
            entries.insert(id, value);
        }
        self.persist(&entries);
    }

    /// List all entries, ordered by id for determinism.
    pub fn list(&self) -> Vec<(String, T)> {
        let entries = self.entries.lock().unwrap();
        let mut items: Vec<(String, T)> = entries
            .iter()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite the store file in full. Failures are logged, never raised.
    fn persist(&self, entries: &HashMap<String, T>) {
        let Some(ref path) = self.store_file else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create store directory {:?}: {}", parent, e);
                return;
            }
        }

        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!("Could not persist store to {:?}: {}", path, e);
                }
            }
            Err(e) => tracing::warn!("Could not serialize store: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_put_get() {
        let repo: Repository<String> = Repository::in_memory();
        assert!(repo.is_empty());

        repo.put("a".to_string(), "alpha".to_string());
        assert_eq!(repo.get("a"), Some("alpha".to_string()));
        assert_eq!(repo.get("b"), None);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let repo: Repository<u32> = Repository::in_memory();
        repo.put("k".to_string(), 1);
        repo.put("k".to_string(), 2);
        assert_eq!(repo.get("k"), Some(2));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_list_sorted_by_id() {
        let repo: Repository<u32> = Repository::in_memory();
        repo.put("b".to_string(), 2);
        repo.put("a".to_string(), 1);

        let ids: Vec<String> = repo.list().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_store_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");

        {
            let repo: Repository<String> = Repository::with_store_file(path.clone());
            repo.put_all(vec![
                ("x".to_string(), "one".to_string()),
                ("y".to_string(), "two".to_string()),
            ]);
        }

        let reloaded: Repository<String> = Repository::with_store_file(path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("x"), Some("one".to_string()));
    }

    #[test]
    fn test_corrupt_store_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let repo: Repository<String> = Repository::with_store_file(path);
        assert!(repo.is_empty());
    }
}
