//! Keyed persistent store over per-item JSON files.
//!
//! Each namespace (snippets, comments) gets its own directory under
//! `~/.local/share/codecritic/`, one JSON file per item id. Writing one
//! item never rewrites the rest of the collection, so concurrent sessions
//! can only clobber the single item they both touched, not the whole set.

use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors from the persistent store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store directory could not be determined")]
    NoDataDir,

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored item is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Filesystem-backed keyed store for one entity type.
pub struct FileStore<T> {
    dir: Option<PathBuf>,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> FileStore<T> {
    /// Create a store under the default data directory for a namespace.
    pub fn new(namespace: &str) -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join(crate::constants::CONFIG_DIR).join(namespace));
        Self {
            dir,
            _marker: PhantomData,
        }
    }

    /// Create a store rooted at a specific directory (useful for testing).
    pub fn new_with_dir(dir: PathBuf) -> Self {
        Self {
            dir: Some(dir),
            _marker: PhantomData,
        }
    }

    /// Fetch one item by id. Missing or unreadable items are `None`.
    pub fn get(&self, id: &str) -> Option<T> {
        let path = self.item_path(id)?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Write one item under its id, creating the directory if needed.
    pub fn put(&self, id: &str, item: &T) -> Result<(), StoreError> {
        let path = self.item_path(id).ok_or(StoreError::NoDataDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(item)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Remove one item. Removing an absent id is not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.item_path(id).ok_or(StoreError::NoDataDir)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load every item in the namespace. Order is unspecified — callers
    /// sort by their own timestamps. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        let Some(ref dir) = self.dir else {
            return Err(StoreError::NoDataDir);
        };
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if let Ok(item) = serde_json::from_str(&content) {
                        items.push(item);
                    }
                }
            }
        }
        Ok(items)
    }

    /// Remove every item in the namespace.
    pub fn clear(&self) -> Result<(), StoreError> {
        let Some(ref dir) = self.dir else {
            return Err(StoreError::NoDataDir);
        };
        if dir.exists() {
            std::fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    fn item_path(&self, id: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{id}.json")))
    }
}
