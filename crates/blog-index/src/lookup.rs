//! Article lookup by path
//!
//! Builds an [`Article`] from the metadata of the article page. Lookups are
//! cached so repeated cards for the same article fetch the page once.

use crate::meta::{fetch_page_meta, PageMeta};
use blog_core::ResourceFetcher;
use blog_taxonomy::{Article, TaxonomyStore};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Title suffixes dropped from `og:title`
const TITLE_ENDINGS: [&str; 4] = ["|Adobe", "| Adobe", "| Adobe Blog", "|Adobe Blog"];

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Cache of looked-up articles keyed by path
///
/// Misses are cached as `None` so a missing article is not fetched again.
#[derive(Debug, Clone)]
pub struct ArticleCache {
    inner: Cache<String, Option<Arc<Article>>>,
}

impl ArticleCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get or compute the lookup for a path
    pub async fn get_or_insert_with<F, Fut>(&self, path: &str, f: F) -> Option<Arc<Article>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Option<Article>>,
    {
        if let Some(cached) = self.inner.get(path).await {
            return cached;
        }
        let article = f().await.map(Arc::new);
        self.inner.insert(path.to_string(), article.clone()).await;
        article
    }

    /// Invalidate one path
    #[inline]
    pub async fn invalidate(&self, path: &str) {
        self.inner.invalidate(path).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for ArticleCache {
    /// Create cache with default capacity (1,000 entries)
    fn default() -> Self {
        Self::new(1_000)
    }
}

/// Trim known site suffixes from a page title
#[must_use]
pub fn trim_title(title: &str) -> String {
    let mut title = title.trim();
    for ending in TITLE_ENDINGS {
        if let Some(stripped) = title.strip_suffix(ending) {
            title = stripped;
        }
    }
    title.trim_end().to_string()
}

/// Build an article from page metadata, `None` without an `og:title`
#[must_use]
pub fn article_from_meta(path: &str, meta: &PageMeta) -> Option<Article> {
    let field = |key: &str| meta.get(key).cloned().unwrap_or_default();
    let mut article = Article::new(path);
    article.title = trim_title(meta.get("og:title")?);
    article.description = field("description");
    article.author = field("author");
    article.image = field("og:image");
    article.image_alt = meta.get("og:image:alt").cloned();
    article.date = field("publication-date");
    article.tags = meta.get("article:tag").cloned();
    Some(article)
}

/// Looks up articles by path through their page metadata
#[derive(Clone)]
pub struct ArticleLookup {
    fetcher: Arc<dyn ResourceFetcher>,
    cache: ArticleCache,
}

impl ArticleLookup {
    /// Create lookup with the default cache
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            cache: ArticleCache::default(),
        }
    }

    /// With a specific cache
    #[must_use]
    pub fn with_cache(mut self, cache: ArticleCache) -> Self {
        self.cache = cache;
        self
    }

    /// Cache in use
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    /// Article at `path` with its taxonomy loaded, `None` if it does not exist
    ///
    /// The taxonomy is computed against `store` as it is now; a copy taken
    /// before the store loaded completes itself on its next
    /// [`Article::taxonomy`] call.
    pub async fn get_blog_article(
        &self,
        path: &str,
        store: Option<&TaxonomyStore>,
    ) -> Option<Article> {
        let fetcher = Arc::clone(&self.fetcher);
        let cached = self
            .cache
            .get_or_insert_with(path, || async move {
                let meta = fetch_page_meta(fetcher.as_ref(), path).await?;
                article_from_meta(path, &meta)
            })
            .await?;
        let mut article = (*cached).clone();
        article.taxonomy(store);
        Some(article)
    }
}

impl std::fmt::Debug for ArticleLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleLookup")
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::parse_head_meta;
    use blog_test_utils::MemoryFetcher;
    use pretty_assertions::assert_eq;

    const HTML: &str = r#"<head>
        <meta property="og:title" content="Zero trust | Adobe Blog">
        <meta name="description" content="How to">
        <meta name="author" content="Jane Doe">
        <meta property="og:image" content="/media/zt.png">
        <meta name="publication-date" content="2023-05-01">
        <meta property="article:tag" content="Security">
        </head>"#;

    #[test]
    fn title_endings_trimmed() {
        assert_eq!(trim_title("Title | Adobe Blog"), "Title");
        assert_eq!(trim_title("Title|Adobe"), "Title");
        assert_eq!(trim_title("  Title | Adobe  "), "Title");
        assert_eq!(trim_title("Adobe news"), "Adobe news");
    }

    #[test]
    fn article_needs_title() {
        let mut meta = parse_head_meta(HTML);
        let article = article_from_meta("/en/zt", &meta).unwrap();
        assert_eq!(article.title, "Zero trust");
        assert_eq!(article.author, "Jane Doe");
        assert_eq!(article.image_alt, None);
        assert_eq!(article.tags.as_deref(), Some("Security"));

        meta.shift_remove("og:title");
        assert!(article_from_meta("/en/zt", &meta).is_none());
    }

    #[tokio::test]
    async fn lookups_are_cached() {
        let fetcher = Arc::new(MemoryFetcher::new().with("/en/zt?noredirect", HTML));
        let lookup = ArticleLookup::new(fetcher.clone());

        let first = lookup.get_blog_article("/en/zt", None).await.unwrap();
        let second = lookup.get_blog_article("/en/zt", None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.cached_taxonomy().unwrap().category, "Security");
        assert_eq!(fetcher.request_count("/en/zt?noredirect"), 1);

        assert!(lookup.get_blog_article("/en/missing", None).await.is_none());
        assert!(lookup.get_blog_article("/en/missing", None).await.is_none());
        assert_eq!(fetcher.request_count("/en/missing?noredirect"), 1);
    }
}
