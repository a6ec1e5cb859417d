//! Local key-value storage
//!
//! The app keeps each document (session, weight log) under a string key.
//! [`FileStore`] maps keys to JSON files in a data directory;
//! [`MemoryStore`] backs tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{AppError, AppResult};

/// String-keyed document store
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`, if any
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous document
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete the document under `key`; absent keys are not an error
    fn remove(&self, key: &str) -> AppResult<()>;
}

fn check_key(key: &str) -> AppResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!("invalid storage key '{key}'")))
    }
}

// ============================================================================
// File Store
// ============================================================================

/// One `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        check_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.base_path)?;

        // Readers only ever see a complete document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(key, path = %path.display(), bytes = value.len(), "Stored document");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-process store, used by tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        check_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        check_key(key)?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        check_key(key)?;
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("treadmill-calc-data").unwrap(), None);
        store.set("treadmill-calc-data", r#"{"weight":80}"#).unwrap();
        assert_eq!(
            store.get("treadmill-calc-data").unwrap().as_deref(),
            Some(r#"{"weight":80}"#)
        );
        assert!(dir.path().join("nested/treadmill-calc-data.json").is_file());
        assert!(!dir.path().join("nested/treadmill-calc-data.json.tmp").exists());

        store.remove("treadmill-calc-data").unwrap();
        assert_eq!(store.get("treadmill-calc-data").unwrap(), None);
        // Removing twice is fine
        store.remove("treadmill-calc-data").unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("weight-deficit-log", "[]").unwrap();
        assert_eq!(store.get("weight-deficit-log").unwrap().as_deref(), Some("[]"));
        store.remove("weight-deficit-log").unwrap();
        assert_eq!(store.get("weight-deficit-log").unwrap(), None);
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case("a/b")]
    #[case("with space")]
    fn test_rejects_bad_keys(#[case] key: &str) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get(key), Err(AppError::InvalidInput(_))));
        assert!(matches!(store.set(key, "x"), Err(AppError::InvalidInput(_))));
    }
}
