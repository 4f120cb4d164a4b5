//! Topic resolution
//!
//! Turns an article's raw tag list into its [`ArticleTaxonomy`]. Without a
//! store only the category and the raw topics can be computed; the closure
//! fields stay `None` so "not computed" is distinguishable from "computed as
//! empty".

use crate::store::TaxonomyStore;
use serde::{Deserialize, Serialize};

/// Category used when an article carries no tags
pub const DEFAULT_CATEGORY: &str = "news";

/// Derived taxonomy of one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleTaxonomy {
    /// Main topic: the first authored tag
    pub category: String,
    /// Tags as authored
    pub topics: Vec<String>,
    /// Visible topics including visible parents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_topics: Option<Vec<String>>,
    /// All topics including parents, minus metadata-excluded ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_topics: Option<Vec<String>>,
}

impl ArticleTaxonomy {
    /// Taxonomy of an untagged article, computed as empty
    #[must_use]
    pub fn untagged() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            topics: Vec::new(),
            visible_topics: Some(Vec::new()),
            all_topics: Some(Vec::new()),
        }
    }

    /// Whether the store-dependent fields were computed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.all_topics.is_some()
    }
}

/// Parse a raw tag field such as `["Cloud", "Security"]` or `Cloud, Security`
///
/// Brackets and quotes are stripped, entries are split on commas and trimmed,
/// empty entries are dropped.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.replace(['[', ']', '"'], "")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compute the taxonomy for a list of topics
///
/// `path` only decorates diagnostics for unknown topics.
#[must_use]
pub fn compute_taxonomy(
    topics: &[String],
    store: Option<&TaxonomyStore>,
    path: Option<&str>,
) -> ArticleTaxonomy {
    let category = topics
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let Some(store) = store else {
        return ArticleTaxonomy {
            category,
            topics: topics.to_vec(),
            visible_topics: None,
            all_topics: None,
        };
    };

    let mut all_topics: Vec<String> = Vec::new();
    let mut visible_topics: Vec<String> = Vec::new();

    for tag in topics {
        let Some(topic) = store.get(tag) else {
            tracing::debug!(
                "Unknown topic in tags list: {} {}",
                tag,
                path.map_or_else(|| "(current page)".to_string(), |p| format!("on page {p}"))
            );
            continue;
        };

        if all_topics.contains(tag) || topic.skip_in_meta {
            continue;
        }
        all_topics.push(tag.clone());
        if topic.is_visible {
            visible_topics.push(tag.clone());
        }

        // direct parents only, no recursion into grandparents
        for parent in store.parents(tag).unwrap_or_default() {
            if all_topics.contains(parent) {
                continue;
            }
            match store.get(parent) {
                Some(ptopic) if ptopic.skip_in_meta => {}
                Some(ptopic) => {
                    all_topics.push(parent.clone());
                    if ptopic.is_visible {
                        visible_topics.push(parent.clone());
                    }
                }
                None => {
                    tracing::debug!("Unknown parent topic {} of {}", parent, tag);
                }
            }
        }
    }

    ArticleTaxonomy {
        category,
        topics: topics.to_vec(),
        visible_topics: Some(visible_topics),
        all_topics: Some(all_topics),
    }
}

/// Tags whose topic is flagged to stay out of `article:tag` metadata
#[must_use]
pub fn meta_excluded_tags<'a>(topics: &'a [String], store: &TaxonomyStore) -> Vec<&'a str> {
    topics
        .iter()
        .filter(|tag| store.get(tag).is_some_and(|t| t.skip_in_meta))
        .map(String::as_str)
        .collect()
}
