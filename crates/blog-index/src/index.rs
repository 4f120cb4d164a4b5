//! Article index
//!
//! The language's query index is fetched page by page. Each call to
//! [`ArticleIndex::fetch_next`] pulls one more page until the index reports
//! that everything has been seen.

use crate::error::{fetch_json, IndexResult};
use blog_core::{Language, ResourceFetcher};
use blog_taxonomy::{clean_path, Article};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Entries requested per index page
pub const PAGE_SIZE: usize = 400;

/// One page of the query index
#[derive(Debug, Deserialize)]
struct IndexPage {
    #[serde(default)]
    data: Vec<Article>,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: usize,
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Default)]
struct IndexState {
    data: Vec<Article>,
    by_path: HashMap<String, usize>,
    offset: usize,
    complete: bool,
}

/// Paged article index of one language
pub struct ArticleIndex {
    fetcher: Arc<dyn ResourceFetcher>,
    language: Language,
    page_size: usize,
    state: Mutex<IndexState>,
}

impl ArticleIndex {
    /// Create an empty index
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, language: Language) -> Self {
        Self {
            fetcher,
            language,
            page_size: PAGE_SIZE,
            state: Mutex::new(IndexState::default()),
        }
    }

    /// With a different page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Path of the index page starting at `offset`
    #[must_use]
    pub fn page_path(&self, offset: usize) -> String {
        format!(
            "{}/query-index.json?limit={}&offset={}",
            self.language.root_path(),
            self.page_size,
            offset
        )
    }

    /// Fetch the next page unless the index is complete
    ///
    /// Returns whether the index is complete afterwards.
    ///
    /// # Errors
    /// Returns an error if the page cannot be fetched or parsed; the index
    /// state is left unchanged
    pub async fn fetch_next(&self) -> IndexResult<bool> {
        let mut state = self.state.lock().await;
        if state.complete {
            return Ok(true);
        }

        let path = self.page_path(state.offset);
        let page: IndexPage = fetch_json(self.fetcher.as_ref(), &path).await?;
        let complete = page.limit + page.offset == page.total;

        if page.data.is_empty() && !complete {
            tracing::debug!("Empty index page at {}, treating index as complete", path);
        }
        let exhausted = complete || page.data.is_empty();

        for article in page.data {
            let key = clean_path(&article.path).to_string();
            state.data.push(article);
            let idx = state.data.len() - 1;
            state.by_path.insert(key, idx);
        }
        state.complete = exhausted;
        state.offset = page.offset + self.page_size;
        Ok(state.complete)
    }

    /// Fetch pages until the index is complete
    ///
    /// # Errors
    /// Returns the first page error
    pub async fn fetch_all(&self) -> IndexResult<usize> {
        while !self.fetch_next().await? {}
        Ok(self.len().await)
    }

    /// Article by path, with or without extension
    pub async fn get(&self, path: &str) -> Option<Article> {
        let state = self.state.lock().await;
        state
            .by_path
            .get(clean_path(path))
            .and_then(|&i| state.data.get(i))
            .cloned()
    }

    /// Visit the articles fetched so far, in index order, under the index lock
    ///
    /// Taxonomies computed through `f` stay cached on the index entries.
    pub async fn for_each_article<F: FnMut(&mut Article)>(&self, mut f: F) {
        let mut state = self.state.lock().await;
        for article in &mut state.data {
            f(article);
        }
    }

    /// Number of articles fetched so far
    pub async fn len(&self) -> usize {
        self.state.lock().await.data.len()
    }

    /// Whether every page has been fetched
    pub async fn is_complete(&self) -> bool {
        self.state.lock().await.complete
    }
}

impl std::fmt::Debug for ArticleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleIndex")
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
