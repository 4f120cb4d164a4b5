//! Taxonomy loading and the shared taxonomy handle
//!
//! The handle is written once per page lifecycle, either with the loaded store
//! or as unavailable, and read many times afterwards. Before that write it
//! reports [`TaxonomyState::NotLoaded`], which callers must treat as "absent",
//! not as an empty taxonomy.

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::sheet::TaxonomySheet;
use crate::store::TaxonomyStore;
use blog_core::{Language, ResourceFetcher};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Observable state of the taxonomy handle
#[derive(Debug, Clone)]
pub enum TaxonomyState {
    /// Load has not settled yet
    NotLoaded,
    /// Store is available
    Loaded(Arc<TaxonomyStore>),
    /// Load settled without a store
    Unavailable,
}

impl TaxonomyState {
    /// Whether the load has settled, successfully or not
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::NotLoaded)
    }
}

/// Write-once, shareable reference to the page taxonomy
#[derive(Debug, Clone, Default)]
pub struct TaxonomyHandle {
    cell: Arc<OnceCell<Option<Arc<TaxonomyStore>>>>,
}

impl TaxonomyHandle {
    /// Create handle in the not-loaded state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create handle already holding a store
    #[must_use]
    pub fn loaded(store: TaxonomyStore) -> Self {
        let handle = Self::new();
        handle.settle(Some(store));
        handle
    }

    /// Create handle already settled as unavailable
    #[must_use]
    pub fn unavailable() -> Self {
        let handle = Self::new();
        handle.settle(None);
        handle
    }

    /// Settle the handle; returns `false` if it was already settled
    pub fn settle(&self, store: Option<TaxonomyStore>) -> bool {
        self.cell.set(store.map(Arc::new)).is_ok()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> TaxonomyState {
        match self.cell.get() {
            None => TaxonomyState::NotLoaded,
            Some(Some(store)) => TaxonomyState::Loaded(Arc::clone(store)),
            Some(None) => TaxonomyState::Unavailable,
        }
    }

    /// Loaded store, if any
    #[inline]
    #[must_use]
    pub fn store(&self) -> Option<&TaxonomyStore> {
        self.cell.get().and_then(|s| s.as_deref())
    }

    /// Whether the load has settled
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Fetches and parses the language-scoped taxonomy sheet
#[derive(Clone)]
pub struct TaxonomyLoader {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl std::fmt::Debug for TaxonomyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaxonomyLoader").finish_non_exhaustive()
    }
}

impl TaxonomyLoader {
    /// Create loader over a fetcher
    #[inline]
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Site path of the taxonomy sheet for a language
    #[inline]
    #[must_use]
    pub fn sheet_path(language: Language) -> String {
        format!("{}/topics/_taxonomy.json", language.root_path())
    }

    /// Fetch and parse the store
    ///
    /// # Errors
    /// Returns fetch, not-found and parse failures
    pub async fn try_load(&self, language: Language) -> TaxonomyResult<TaxonomyStore> {
        let path = Self::sheet_path(language);
        let json = self
            .fetcher
            .fetch_text(&path)
            .await?
            .ok_or(TaxonomyError::NotFound(path))?;
        Ok(TaxonomySheet::parse(&json)?.into_store(language))
    }

    /// Fetch and parse the store, degrading to `None` on any failure
    pub async fn load(&self, language: Language) -> Option<TaxonomyStore> {
        match self.try_load(language).await {
            Ok(store) => {
                tracing::debug!(%language, topics = store.len(), "taxonomy loaded");
                Some(store)
            }
            Err(e) => {
                tracing::debug!(%language, "taxonomy unavailable: {}", e);
                None
            }
        }
    }

    /// Load into a handle exactly once
    ///
    /// Skips the fetch when the handle has already settled. Returns the state
    /// after settling.
    pub async fn load_into(&self, handle: &TaxonomyHandle, language: Language) -> TaxonomyState {
        if !handle.is_settled() {
            let store = self.load(language).await;
            if !handle.settle(store) {
                tracing::debug!("taxonomy handle settled concurrently, keeping first result");
            }
        }
        handle.state()
    }
}
