//! Resource fetching
//!
//! Every piece of site content the runtime consumes (taxonomy sheet, query
//! index, page metadata, placeholders) goes through [`ResourceFetcher`]. A
//! missing resource is `Ok(None)`; transport and IO failures are errors and it
//! is up to the caller whether they are fatal.

use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Fetches site resources by absolute site path (`/en/query-index.json?limit=1`)
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch a resource as text, `None` when it does not exist
    async fn fetch_text(&self, path: &str) -> FetchResult<Option<String>>;
}

/// Fetcher backed by the live site over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpFetcher {
    /// Create fetcher for an origin such as `https://blog.example.com`
    ///
    /// # Errors
    /// Returns `FetchError::InvalidPath` if the origin is not a valid URL
    pub fn new(origin: &str) -> FetchResult<Self> {
        let base =
            reqwest::Url::parse(origin).map_err(|_| FetchError::InvalidPath(origin.to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// With a preconfigured client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Origin this fetcher resolves paths against
    #[inline]
    #[must_use]
    pub fn base(&self) -> &reqwest::Url {
        &self.base
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> FetchResult<Option<String>> {
        let url = self
            .base
            .join(path)
            .map_err(|_| FetchError::InvalidPath(path.to_string()))?;
        tracing::debug!(%url, "fetching resource");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::http(url.as_str(), e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map(Some)
            .map_err(|e| FetchError::http(url.as_str(), e))
    }
}

/// Fetcher backed by a local content directory
///
/// Site paths map onto files below the root; the query string is ignored and
/// extensionless page paths resolve to `<path>.html`.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Create fetcher rooted at a content directory
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a site path onto a file below the root
    ///
    /// # Errors
    /// Returns `FetchError::InvalidPath` for empty paths or paths escaping the root
    pub fn resolve(&self, path: &str) -> FetchResult<PathBuf> {
        let without_query = path.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(without_query.trim_start_matches('/'));

        if relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(FetchError::InvalidPath(path.to_string()));
        }

        let mut file = self.root.join(relative);
        if file.extension().is_none() {
            file.set_extension("html");
        }
        Ok(file)
    }
}

#[async_trait]
impl ResourceFetcher for DirFetcher {
    async fn fetch_text(&self, path: &str) -> FetchResult<Option<String>> {
        let file = self.resolve(path)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FetchError::io_error(file, e)),
        }
    }
}
