//! Key-value persistence.
//!
//! The engine only needs `get`/`set`/`remove` on string values. Two backends
//! are provided: [`MemoryStore`] for tests and embedding, and [`FileStore`],
//! which keeps one file per key in a directory.
//!
//! The entry archive is the raw entry list (ids included) as JSON.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::{JournalEntry, RawEntry};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage key {0:?} cannot be used as a file name")]
    InvalidKey(String),
    #[error("storage io failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// One file per key under `root`. Characters outside `[A-Za-z0-9._-]` in a
/// key are written as `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() || name.chars().all(|c| c == '.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(name))
    }
}

fn io_error(key: &str, source: io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| io_error(key, e))?;
        fs::write(path, value).map_err(|e| io_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// Persist the entry list under `key`.
pub fn save_entries<S>(store: &mut S, key: &str, entries: &[JournalEntry]) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(entries)?;
    store.set(key, &json)?;
    debug!(key, entries = entries.len(), "entry archive saved");
    Ok(())
}

/// Read the entry list stored under `key`.
///
/// A missing, unreadable or corrupt archive yields an empty list. Besides the
/// plain list, the older `{"state": {"entries": [...]}}` wrapper is accepted.
/// Individual elements that fail to decode are skipped.
pub fn load_entries<S>(store: &S, key: &str) -> Vec<RawEntry>
where
    S: KeyValueStore + ?Sized,
{
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, %err, "entry archive unreadable");
            return Vec::new();
        }
    };
    let value: Value = match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, %err, "entry archive is not JSON");
            return Vec::new();
        }
    };
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map
            .remove("state")
            .and_then(|mut state| state.get_mut("entries").map(Value::take))
        {
            Some(Value::Array(items)) => items,
            _ => {
                warn!(key, "entry archive has no entry list");
                return Vec::new();
            }
        },
        _ => {
            warn!(key, "entry archive has no entry list");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawEntry>(item) {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!(key, %err, "skipping undecodable archived entry");
                None
            }
        })
        .collect()
}
