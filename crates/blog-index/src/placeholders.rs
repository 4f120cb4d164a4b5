//! Localized placeholders
//!
//! `/{lang}/placeholders.json` maps keys to display texts. It is fetched on
//! first use and kept for the rest of the page view.

use crate::error::{fetch_json, IndexError, IndexResult};
use blog_core::{Language, ResourceFetcher};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
struct PlaceholderSheet {
    #[serde(default)]
    data: Vec<PlaceholderRow>,
}

#[derive(Debug, Deserialize)]
struct PlaceholderRow {
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "Text", default)]
    text: String,
}

/// Placeholder texts of one language
pub type PlaceholderMap = HashMap<String, String>;

/// Lazily fetched placeholders
pub struct Placeholders {
    fetcher: Arc<dyn ResourceFetcher>,
    language: Language,
    texts: OnceCell<Arc<PlaceholderMap>>,
}

impl Placeholders {
    /// Create for a language, nothing fetched yet
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, language: Language) -> Self {
        Self {
            fetcher,
            language,
            texts: OnceCell::new(),
        }
    }

    /// Path of the placeholder sheet
    #[must_use]
    pub fn sheet_path(language: Language) -> String {
        format!("{}/placeholders.json", language.root_path())
    }

    /// All placeholders, fetching them on first call
    ///
    /// # Errors
    /// Returns an error if the sheet cannot be fetched or parsed; the next
    /// call tries again
    pub async fn all(&self) -> IndexResult<Arc<PlaceholderMap>> {
        self.texts
            .get_or_try_init(|| async {
                let path = Self::sheet_path(self.language);
                let sheet: PlaceholderSheet = fetch_json(self.fetcher.as_ref(), &path).await?;
                let map: PlaceholderMap = sheet
                    .data
                    .into_iter()
                    .filter(|row| !row.key.is_empty())
                    .map(|row| (row.key, row.text))
                    .collect();
                Ok::<_, IndexError>(Arc::new(map))
            })
            .await
            .cloned()
    }

    /// One placeholder text
    ///
    /// # Errors
    /// Returns an error if the sheet cannot be fetched or parsed
    pub async fn get(&self, key: &str) -> IndexResult<Option<String>> {
        Ok(self.all().await?.get(key).cloned())
    }
}

impl std::fmt::Debug for Placeholders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placeholders")
            .field("language", &self.language)
            .field("loaded", &self.texts.initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_test_utils::MemoryFetcher;

    const SHEET: &str = r#"{ "data": [
        { "Key": "read-more", "Text": "Weiterlesen" },
        { "Key": "", "Text": "ignored" }
    ] }"#;

    #[tokio::test]
    async fn fetched_once() {
        let fetcher = Arc::new(MemoryFetcher::new().with("/de/placeholders.json", SHEET));
        let placeholders = Placeholders::new(fetcher.clone(), Language::De);

        assert_eq!(
            placeholders.get("read-more").await.unwrap().as_deref(),
            Some("Weiterlesen")
        );
        assert_eq!(placeholders.get("missing").await.unwrap(), None);
        assert_eq!(placeholders.all().await.unwrap().len(), 1);
        assert_eq!(fetcher.request_count("/de/placeholders.json"), 1);
    }

    #[tokio::test]
    async fn missing_sheet_is_an_error() {
        let placeholders = Placeholders::new(Arc::new(MemoryFetcher::new()), Language::En);
        assert!(placeholders.all().await.is_err());
    }
}
