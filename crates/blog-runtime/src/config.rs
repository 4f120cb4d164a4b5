//! Runtime configuration
//!
//! Loaded from TOML; every field has a default so an empty file is a valid
//! configuration.

use crate::delayed::EnvType;
use crate::error::{ConfigError, RuntimeResult};
use blog_core::{DirFetcher, HttpFetcher, ResourceFetcher};
use blog_index::ArticleCache;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Page load runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Site origin resources are fetched from
    pub origin: String,
    /// Serve resources from this directory instead of `origin`
    pub content_root: Option<PathBuf>,
    /// Prefix of code assets (styles, favicon)
    pub code_base_path: String,
    /// Delay before the delayed phase runs, in milliseconds
    pub delayed_ms: u64,
    /// Blocks whose loading is part of the largest contentful paint
    pub lcp_blocks: Vec<String>,
    /// Query index page size
    pub index_page_size: usize,
    /// Maximum number of looked-up articles kept
    pub article_cache_capacity: u64,
    /// Expiry of looked-up articles, in seconds
    pub article_cache_ttl_secs: Option<u64>,
    /// Number of articles kept in the reading history
    pub history_depth: usize,
    /// Reading history file; kept in memory when unset
    pub history_file: Option<PathBuf>,
    /// Analytics hosts and launch scripts
    pub analytics: AnalyticsConfig,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` for out-of-range values
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`RuntimeConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "index_page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.article_cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "article_cache_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// With origin
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// With a local content directory
    #[inline]
    #[must_use]
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    /// With delayed phase delay
    #[inline]
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delayed_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With LCP blocks
    #[inline]
    #[must_use]
    pub fn with_lcp_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lcp_blocks = blocks.into_iter().map(Into::into).collect();
        self
    }

    /// With history file
    #[inline]
    #[must_use]
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    /// Delay before the delayed phase
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delayed_ms)
    }

    /// Path of a code asset such as `/styles/lazy-styles.css`
    #[must_use]
    pub fn asset_path(&self, path: &str) -> String {
        format!("{}{}", self.code_base_path.trim_end_matches('/'), path)
    }

    /// Fetcher for site resources
    ///
    /// # Errors
    /// Returns `RuntimeError::Fetch` if `origin` is not a valid URL
    pub fn fetcher(&self) -> RuntimeResult<Arc<dyn ResourceFetcher>> {
        Ok(match &self.content_root {
            Some(root) => Arc::new(DirFetcher::new(root.clone())),
            None => Arc::new(HttpFetcher::new(&self.origin)?),
        })
    }

    /// Article lookup cache sized by this configuration
    #[must_use]
    pub fn article_cache(&self) -> ArticleCache {
        match self.article_cache_ttl_secs {
            Some(secs) => ArticleCache::with_ttl(self.article_cache_capacity, Duration::from_secs(secs)),
            None => ArticleCache::new(self.article_cache_capacity),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            content_root: None,
            code_base_path: String::new(),
            delayed_ms: 3_000,
            lcp_blocks: Vec::new(),
            index_page_size: blog_index::PAGE_SIZE,
            article_cache_capacity: 1_000,
            article_cache_ttl_secs: None,
            history_depth: 5,
            history_file: None,
            analytics: AnalyticsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Analytics environments and launch scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Hostname → environment; unknown hosts are `dev`
    pub hosts: BTreeMap<String, EnvType>,
    /// Launch script per environment
    pub scripts: AnalyticsScripts,
}

impl AnalyticsConfig {
    /// Environment of a hostname
    #[must_use]
    pub fn env_type(&self, host: &str) -> EnvType {
        self.hosts.get(host).copied().unwrap_or_default()
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let hosts = [
            ("main--inside-aem--adobe.hlx.page", EnvType::Preview),
            ("main--inside-aem--adobe.hlx.live", EnvType::Live),
            ("analytics--inside-aem--adobe.hlx.live", EnvType::Live),
        ]
        .into_iter()
        .map(|(host, env)| (host.to_string(), env))
        .collect();
        Self {
            hosts,
            scripts: AnalyticsScripts::default(),
        }
    }
}

/// Launch script per environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsScripts {
    /// Script for `dev` hosts
    pub dev: String,
    /// Script for `preview` hosts
    pub preview: String,
    /// Script for `live` hosts
    pub live: String,
}

impl AnalyticsScripts {
    /// Script for an environment
    #[must_use]
    pub fn for_env(&self, env: EnvType) -> &str {
        match env {
            EnvType::Dev => &self.dev,
            EnvType::Preview => &self.preview,
            EnvType::Live => &self.live,
        }
    }
}

impl Default for AnalyticsScripts {
    fn default() -> Self {
        const LAUNCH: &str = "https://assets.adobedtm.com/6a74768abd57/a692f024da9a";
        Self {
            dev: format!("{LAUNCH}/launch-6005424708d4-development.min.js"),
            preview: format!("{LAUNCH}/launch-166628721e50-staging.min.js"),
            live: format!("{LAUNCH}/launch-3ae9c8b61452.min.js"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: '{other}'")),
        }
    }
}

/// Logging configuration; `RUST_LOG` overrides the filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directives
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
