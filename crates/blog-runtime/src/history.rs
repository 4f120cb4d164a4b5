//! Reading history
//!
//! Article pages record themselves, newest first, in a small key-value store
//! so later pages can personalise on what was read. One list per locale under
//! `blog-{locale}-history`.

use crate::error::{RuntimeError, RuntimeResult};
use blog_core::Language;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// String key-value storage the history lives in
pub trait HistoryStore: Send + Sync {
    /// Value under `key`
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read
    fn get(&self, key: &str) -> RuntimeResult<Option<String>>;

    /// Store `value` under `key`
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written
    fn set(&self, key: &str, value: &str) -> RuntimeResult<()>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryHistoryStore {
    /// Create empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, key: &str) -> RuntimeResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RuntimeResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage in a JSON object file, created on first write
#[derive(Debug)]
pub struct FileHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileHistoryStore {
    /// Storage backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RuntimeResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(RuntimeError::HistoryIo {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl HistoryStore for FileHistoryStore {
    fn get(&self, key: &str) -> RuntimeResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> RuntimeResult<()> {
        let _guard = self.lock.lock();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json).map_err(|source| RuntimeError::HistoryIo {
            path: self.path.clone(),
            source,
        })
    }
}

/// One read article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Site path of the article
    pub path: String,
    /// `article:tag` metadata of the page
    pub tags: String,
}

/// Articles read, newest first
#[derive(Clone)]
pub struct ArticleHistory {
    store: Arc<dyn HistoryStore>,
    depth: usize,
}

impl ArticleHistory {
    /// Number of entries kept by default
    pub const DEFAULT_DEPTH: usize = 5;

    /// History kept in `store`
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            depth: Self::DEFAULT_DEPTH,
        }
    }

    /// Keep `depth` entries
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Storage key of a language's history
    #[must_use]
    pub fn key(language: Language) -> String {
        format!("blog-{}-history", language.locale())
    }

    /// Entries of a language, newest first
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or holds invalid JSON
    pub fn entries(&self, language: Language) -> RuntimeResult<Vec<HistoryEntry>> {
        match self.store.get(&Self::key(language))? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Record a read article at the front, dropping the oldest beyond depth
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or written
    pub fn record(&self, language: Language, path: &str, tags: &str) -> RuntimeResult<()> {
        let mut entries = self.entries(language)?;
        entries.insert(
            0,
            HistoryEntry {
                path: path.to_string(),
                tags: tags.to_string(),
            },
        );
        entries.truncate(self.depth);
        let json = serde_json::to_string(&entries)?;
        self.store.set(&Self::key(language), &json)
    }
}

impl std::fmt::Debug for ArticleHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleHistory")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
