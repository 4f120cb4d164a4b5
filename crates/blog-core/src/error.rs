//! Error types for resource fetching

/// Errors while fetching a site resource
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Resource path could not be mapped to a location
    #[error("invalid resource path: '{0}'")]
    InvalidPath(String),

    /// HTTP transport failure
    #[error("http error fetching {url}: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Transport error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status other than 404
    #[error("unexpected status {status} for {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// IO error while reading from the content directory
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: std::path::PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Create HTTP error for url
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_display() {
        let err = FetchError::InvalidPath("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "invalid resource path: '../etc/passwd'");
    }

    #[test]
    fn status_display() {
        let err = FetchError::Status {
            url: "https://blog.example.com/en/query-index.json".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("503"));
    }
}
