//! Key-value backends the store persists into.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key '{key}': {source}")]
    Read { key: String, source: io::Error },

    #[error("failed to write key '{key}': {source}")]
    Write { key: String, source: io::Error },

    #[error("writes to key '{0}' are disabled")]
    ReadOnly(String),
}

/// String-keyed blob storage. Each key holds one serialized value.
pub trait Storage {
    /// Value stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            // the blob is replaced whole, never partially written
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, self.path(key))
        };
        write().map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory storage, used by tests and benchmarks.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            read_only: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly(key.to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get("employees").unwrap().is_none());
    }

    #[test]
    fn file_storage_round_trip_creates_dir() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.set("theme", "\"dark\"").unwrap();

        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("\"dark\""));
        assert!(dir.path().join("nested/theme.json").exists());
        assert!(!dir.path().join("nested/theme.json.tmp").exists());
    }

    #[test]
    fn file_storage_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("isLoggedIn", "true").unwrap();
        storage.set("isLoggedIn", "false").unwrap();
        assert_eq!(storage.get("isLoggedIn").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn read_only_memory_storage_rejects_writes() {
        let mut storage = MemoryStorage::read_only();
        assert!(matches!(
            storage.set("employees", "[]"),
            Err(StorageError::ReadOnly(_))
        ));
    }
}
