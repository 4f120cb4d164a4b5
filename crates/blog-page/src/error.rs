//! Error types for page decoration
//!
//! Decoration steps report what they could not do; the caller decides whether
//! to log and continue. Nothing here aborts a page load.

/// Errors raised while decorating a page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Page has no `main` element
    #[error("page has no main element")]
    NoMain,

    /// An element a decorator depends on is missing
    #[error("missing {element} for {decorator}")]
    MissingElement {
        /// Decorator that needed the element
        decorator: &'static str,
        /// What was missing
        element: &'static str,
    },

    /// Page JSON could not be read or written
    #[error("invalid page document: {0}")]
    Json(#[from] serde_json::Error),
}

impl PageError {
    /// Create a missing element error
    #[must_use]
    pub fn missing(decorator: &'static str, element: &'static str) -> Self {
        Self::MissingElement { decorator, element }
    }
}

/// Result type alias for page operations
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_display() {
        let err = PageError::missing("article-header", "picture");
        assert_eq!(err.to_string(), "missing picture for article-header");
    }
}
