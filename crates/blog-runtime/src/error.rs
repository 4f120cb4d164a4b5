//! Error types for the page load runtime

use crate::phase::LoadPhase;
use blog_core::FetchError;
use blog_page::PageError;
use std::path::PathBuf;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML or has the wrong shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Errors raised by the page load runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Page document problem
    #[error(transparent)]
    Page(#[from] PageError),

    /// Site resources cannot be reached
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Phase change not allowed by the load sequence
    #[error("illegal phase transition: {from} -> {to}")]
    IllegalTransition {
        /// Current phase
        from: LoadPhase,
        /// Requested phase
        to: LoadPhase,
    },

    /// A block failed to load
    #[error("block '{name}' failed to load: {message}")]
    Block {
        /// Block name
        name: String,
        /// Failure description
        message: String,
    },

    /// A script could not be injected
    #[error("script {url} failed to load: {message}")]
    Script {
        /// Script URL
        url: String,
        /// Failure description
        message: String,
    },

    /// History storage could not be read or written
    #[error("history storage error at {path}: {source}")]
    HistoryIo {
        /// Storage file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// History storage content is not valid JSON
    #[error("invalid history data: {0}")]
    HistoryFormat(#[from] serde_json::Error),

    /// Logging could not be initialised
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl RuntimeError {
    /// Create block error
    pub fn block(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Block {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create script error
    pub fn script(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
