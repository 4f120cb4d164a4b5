//! Error types for index and metadata lookups

use blog_core::FetchError;

/// Errors from the article index, metadata scraping and placeholders
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Resource could not be fetched
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// JSON resource has the wrong shape
    #[error("invalid JSON at {path}: {source}")]
    Json {
        /// Resource path
        path: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Create a JSON error for a resource path
    #[must_use]
    pub fn json(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Fetch a resource and parse it as JSON, `NotFound` when it is missing
pub(crate) async fn fetch_json<T: serde::de::DeserializeOwned>(
    fetcher: &dyn blog_core::ResourceFetcher,
    path: &str,
) -> IndexResult<T> {
    let text = fetcher
        .fetch_text(path)
        .await?
        .ok_or_else(|| IndexError::NotFound(path.to_string()))?;
    serde_json::from_str(&text).map_err(|e| IndexError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_names_path() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = IndexError::json("/en/query-index.json", source);
        assert!(err.to_string().starts_with("invalid JSON at /en/query-index.json"));
    }
}
