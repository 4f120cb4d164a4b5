//! Topic entries of the taxonomy

use serde::{Deserialize, Serialize};

/// A named taxonomy node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique topic name, as authors write it in tags
    pub name: String,
    /// Canonical topic page path
    pub link: String,
    /// Whether the topic is surfaced as a user-facing tag
    pub is_visible: bool,
    /// Whether the topic is kept out of `article:tag` page metadata
    pub skip_in_meta: bool,
}

impl Topic {
    /// Create a visible topic that appears in metadata
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            is_visible: true,
            skip_in_meta: false,
        }
    }

    /// Mark topic as hidden from user-facing tags
    #[inline]
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    /// Mark topic as excluded from page metadata
    #[inline]
    #[must_use]
    pub fn skipped_in_meta(mut self) -> Self {
        self.skip_in_meta = true;
        self
    }
}
