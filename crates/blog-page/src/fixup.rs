//! Deferred topic link fixup
//!
//! Links emitted before the taxonomy loaded carry the raw topic name instead
//! of an href. Once the taxonomy has settled, one sweep resolves every such
//! anchor and drops the marker, so a second sweep finds nothing to do.

use crate::document::Page;
use blog_taxonomy::{resolve_href, TaxonomyStore, UNRESOLVED_HREF};

/// Resolve all deferred topic anchors on the page
///
/// With no store every marked anchor falls back to `#`. Returns the number of
/// anchors fixed.
pub fn fixup_topic_links(page: &mut Page, store: Option<&TaxonomyStore>) -> usize {
    let mut fixed = 0;
    page.for_each_anchor_mut(|anchor| {
        let Some(topic) = anchor.topic_link.take() else {
            return;
        };
        anchor.href = match store {
            Some(store) => resolve_href(&topic, store, None),
            None => UNRESOLVED_HREF.to_string(),
        };
        fixed += 1;
    });
    if fixed > 0 {
        tracing::debug!("Fixed {} deferred topic links", fixed);
    }
    fixed
}
