use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::error::{NotesError, Result};

/// Generic key-value persistence: string key to JSON value, read whole at
/// startup, written through after every mutation.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn put(&self, key: &str, value: Value) -> Result<()>;
}

/// File-backed storage: one JSON object per store, rewritten on every put.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    cells: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let cells = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                NotesError::Storage(format!("corrupt store file {}: {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };

        info!("Opened store: {}", path.display());

        Ok(Self {
            path,
            cells: Mutex::new(cells),
        })
    }

    fn flush(&self, cells: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = serde_json::to_string_pretty(cells)?;
        fs::write(&self.path, content)?;

        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cells.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_string(), value);
        self.flush(&cells)
    }
}

/// In-memory storage. Clones share the same cells, which lets an embedder
/// (or a test) keep a handle and observe what the store wrote.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    cells: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cells.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.put("events", json!([{"id": 1}])).unwrap();

        assert_eq!(storage.get("events").unwrap(), Some(json!([{"id": 1}])));
        assert_eq!(storage.get("folders").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_clones_share_cells() {
        let storage = MemoryStorage::new();
        let view = storage.clone();

        storage.put("hf_token", json!("secret")).unwrap();
        assert_eq!(view.get("hf_token").unwrap(), Some(json!("secret")));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let storage = JsonFileStorage::open(&path).unwrap();
            storage.put("folders", json!([{"id": 7, "name": "Work", "icon": "💼"}])).unwrap();
        }

        let reopened = JsonFileStorage::open(&path).unwrap();
        let folders = reopened.get("folders").unwrap().unwrap();
        assert_eq!(folders[0]["name"], "Work");
    }

    #[test]
    fn test_file_storage_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(storage.get("events").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStorage::open(&path).unwrap_err();
        assert!(matches!(err, NotesError::Storage(_)));
    }
}
