//! Error types for taxonomy loading
//!
//! These never escape the loader during a page load: the loader logs them and
//! settles the taxonomy as unavailable.

use blog_core::FetchError;

/// Errors while building or loading a taxonomy store
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    /// Taxonomy resource could not be fetched
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Taxonomy resource does not exist
    #[error("taxonomy not found at {0}")]
    NotFound(String),

    /// Taxonomy sheet is not valid JSON or has the wrong shape
    #[error("invalid taxonomy sheet: {0}")]
    Parse(#[from] serde_json::Error),

    /// Topic inserted twice into the same store
    #[error("duplicate topic: '{0}'")]
    DuplicateTopic(String),
}

/// Result type alias for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
