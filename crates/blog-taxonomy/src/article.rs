//! Articles and their cached taxonomy
//!
//! The taxonomy is computed on first request and cached on the article. A
//! cached value is reused only when its `all_topics` was computed; a value
//! computed before the store loaded is recomputed on the next request.

use crate::resolver::{compute_taxonomy, parse_tags, ArticleTaxonomy};
use crate::store::TaxonomyStore;
use serde::{Deserialize, Serialize};

/// Article record as listed in the index or scraped from page metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Site path of the article page
    pub path: String,
    /// Article title
    #[serde(default)]
    pub title: String,
    /// Teaser text
    #[serde(default)]
    pub description: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Card image URL
    #[serde(default)]
    pub image: String,
    /// Alt text of the card image
    #[serde(default)]
    pub image_alt: Option<String>,
    /// Publication date as authored
    #[serde(default)]
    pub date: String,
    /// Raw tag field, e.g. `["Cloud", "Security"]`
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(skip)]
    taxonomy: Option<ArticleTaxonomy>,
}

impl Article {
    /// Create article for a path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// With raw tag field
    #[inline]
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Path without extension, as used in links and index lookups
    #[must_use]
    pub fn clean_path(&self) -> &str {
        clean_path(&self.path)
    }

    /// Taxonomy, computing and caching it unless a complete value is cached
    pub fn taxonomy(&mut self, store: Option<&TaxonomyStore>) -> &ArticleTaxonomy {
        let cached_complete = self
            .taxonomy
            .as_ref()
            .is_some_and(ArticleTaxonomy::is_complete);
        if !cached_complete {
            let computed = self.compute(store);
            self.taxonomy = Some(computed);
        }
        self.taxonomy.get_or_insert_with(ArticleTaxonomy::untagged)
    }

    /// Cached taxonomy without computing
    #[inline]
    #[must_use]
    pub fn cached_taxonomy(&self) -> Option<&ArticleTaxonomy> {
        self.taxonomy.as_ref()
    }

    fn compute(&self, store: Option<&TaxonomyStore>) -> ArticleTaxonomy {
        match &self.tags {
            Some(raw) if !raw.trim().is_empty() => {
                compute_taxonomy(&parse_tags(raw), store, Some(&self.path))
            }
            _ => ArticleTaxonomy::untagged(),
        }
    }
}

/// Strip the extension from a site path
#[must_use]
pub fn clean_path(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}
