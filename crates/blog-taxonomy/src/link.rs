//! Topic links
//!
//! A link for a topic is either resolved against the store or deferred until
//! the store has loaded. Deferred links keep the raw topic name so the fixup
//! sweep can resolve them later.

use crate::store::TaxonomyStore;
use blog_core::escape_html;
use serde::{Deserialize, Serialize};

/// Marker attribute carried by deferred topic anchors
pub const TOPIC_LINK_ATTR: &str = "data-topic-link";

/// Href used when a topic cannot be resolved
pub const UNRESOLVED_HREF: &str = "#";

/// Link to a topic page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TopicLink {
    /// Href is known
    Resolved {
        /// Topic page link, `#` when unknown
        href: String,
        /// Link text
        label: String,
    },
    /// Store not loaded yet, resolve later by topic name
    Deferred {
        /// Raw topic name
        topic: String,
        /// Link text
        label: String,
    },
}

impl TopicLink {
    /// Href if resolved
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Resolved { href, .. } => Some(href),
            Self::Deferred { .. } => None,
        }
    }

    /// Displayed text
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Resolved { label, .. } | Self::Deferred { label, .. } => label,
        }
    }

    /// Topic name awaiting resolution
    #[must_use]
    pub fn deferred_topic(&self) -> Option<&str> {
        match self {
            Self::Deferred { topic, .. } => Some(topic),
            Self::Resolved { .. } => None,
        }
    }

    /// Render as an anchor tag
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Resolved { href, label } => {
                format!(r#"<a href="{}">{}</a>"#, escape_html(href), escape_html(label))
            }
            Self::Deferred { topic, label } => format!(
                r#"<a href="" {}="{}">{}</a>"#,
                TOPIC_LINK_ATTR,
                escape_html(topic),
                escape_html(label)
            ),
        }
    }
}

/// Display title for a topic
///
/// A few topic names are shown under a different wording than the one used
/// in tags.
#[must_use]
pub fn display_title(topic: &str) -> &str {
    match topic {
        "Transformation digitale" => "Transformation numérique",
        other => other,
    }
}

/// Resolve a topic's href against a store, `#` for unknown topics
#[must_use]
pub fn resolve_href(topic: &str, store: &TaxonomyStore, path: Option<&str>) -> String {
    match store.get(topic) {
        Some(t) => t.link.clone(),
        None => {
            tracing::debug!(
                "Trying to get a link for an unknown topic: {} {}",
                topic,
                path.map_or_else(|| "(current page)".to_string(), |p| format!("on page {p}"))
            );
            UNRESOLVED_HREF.to_string()
        }
    }
}

/// Link for a topic, deferred when the store is not loaded
#[must_use]
pub fn link_for_topic(topic: &str, store: Option<&TaxonomyStore>, path: Option<&str>) -> TopicLink {
    let label = display_title(topic).to_string();
    match store {
        Some(store) => TopicLink::Resolved {
            href: resolve_href(topic, store, path),
            label,
        },
        None => TopicLink::Deferred {
            topic: topic.to_string(),
            label,
        },
    }
}
