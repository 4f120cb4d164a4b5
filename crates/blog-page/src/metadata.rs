//! Page metadata
//!
//! Reads `<meta>` values from the head and keeps `article:tag` entries in sync
//! with the taxonomy once it has loaded.

use crate::document::{Head, HeadLink, MetaTag};
use blog_taxonomy::{compute_taxonomy, TaxonomyStore};
use serde::Serialize;

/// Property carrying the article's tags
pub const ARTICLE_TAG: &str = "article:tag";

fn is_property(name: &str) -> bool {
    name.contains(':')
}

impl MetaTag {
    /// Whether this tag is keyed by `name` the way [`Head::get`] looks it up
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let key = if is_property(name) {
            self.property.as_deref()
        } else {
            self.name.as_deref()
        };
        key == Some(name)
    }
}

impl Head {
    /// Metadata value; repeated entries are joined with `", "`
    ///
    /// Names containing a colon are looked up by `property`, others by `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .metas
            .iter()
            .filter(|m| m.matches(name))
            .map(|m| m.content.as_str())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Metadata value split into its entries, trimmed, empties dropped
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append a meta tag
    pub fn push(&mut self, meta: MetaTag) {
        self.metas.push(meta);
    }

    /// Remove the first `property` meta with the given content
    pub fn remove_property(&mut self, property: &str, content: &str) -> bool {
        let found = self
            .metas
            .iter()
            .position(|m| m.property.as_deref() == Some(property) && m.content == content);
        match found {
            Some(i) => {
                self.metas.remove(i);
                true
            }
            None => false,
        }
    }

    /// Attach a stylesheet once
    pub fn add_stylesheet(&mut self, href: &str) {
        if !self.links.iter().any(|l| l.rel == "stylesheet" && l.href == href) {
            self.links.push(HeadLink {
                rel: "stylesheet".to_string(),
                href: href.to_string(),
            });
        }
    }

    /// Set the favicon, replacing an existing one
    pub fn set_favicon(&mut self, href: &str) {
        let icon = HeadLink {
            rel: "icon".to_string(),
            href: href.to_string(),
        };
        match self.links.iter_mut().find(|l| l.rel == "icon") {
            Some(existing) => *existing = icon,
            None => self.links.push(icon),
        }
    }
}

/// Outcome of [`sync_article_tags`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaSync {
    /// Topics added as `article:tag` (synthesised ancestors)
    pub added: Vec<String>,
    /// Tags moved from `article:tag` to a named flag meta
    pub flagged: Vec<String>,
}

/// Align `article:tag` metas with the taxonomy
///
/// Ancestors computed for the page's tags are added as `article:tag`. Tags
/// flagged to be kept out of metadata lose their `article:tag` entry and are
/// written as `<meta name="<tag>" content="true">` instead.
pub fn sync_article_tags(head: &mut Head, store: &TaxonomyStore) -> MetaSync {
    let current = head.get_all(ARTICLE_TAG);
    let taxonomy = compute_taxonomy(&current, Some(store), None);
    let mut sync = MetaSync::default();

    for topic in taxonomy.all_topics.unwrap_or_default() {
        if !current.contains(&topic) {
            head.push(MetaTag::property(ARTICLE_TAG, topic.as_str()));
            sync.added.push(topic);
        }
    }

    for tag in &current {
        if store.get(tag).is_some_and(|t| t.skip_in_meta) {
            head.remove_property(ARTICLE_TAG, tag);
            head.push(MetaTag::named(tag.as_str(), "true"));
            sync.flagged.push(tag.clone());
        }
    }

    if !sync.added.is_empty() || !sync.flagged.is_empty() {
        tracing::debug!(
            "Synchronised article tags: added {:?}, flagged {:?}",
            sync.added,
            sync.flagged
        );
    }
    sync
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::Language;
    use blog_taxonomy::Topic;
    use pretty_assertions::assert_eq;

    fn head(tags: &[&str]) -> Head {
        let mut head = Head::default();
        head.push(MetaTag::named("author", "Jane Doe"));
        for tag in tags {
            head.push(MetaTag::property(ARTICLE_TAG, *tag));
        }
        head
    }

    fn store() -> TaxonomyStore {
        let mut store = TaxonomyStore::new(Language::En);
        store.insert(Topic::new("Cloud", "/en/topics/cloud")).unwrap();
        store
            .insert_with_parents(Topic::new("Security", "/en/topics/security"), ["Cloud"])
            .unwrap();
        store
            .insert(Topic::new("Sponsored", "/en/topics/sponsored").skipped_in_meta())
            .unwrap();
        store
    }

    #[test]
    fn get_by_name_and_property() {
        let head = head(&["Cloud", "Security"]);
        assert_eq!(head.get("author").as_deref(), Some("Jane Doe"));
        assert_eq!(head.get(ARTICLE_TAG).as_deref(), Some("Cloud, Security"));
        assert_eq!(head.get("missing"), None);
    }

    #[test]
    fn get_all_splits_entries() {
        let mut head = head(&["Cloud"]);
        head.push(MetaTag::property(ARTICLE_TAG, " Security ,"));
        assert_eq!(head.get_all(ARTICLE_TAG), vec!["Cloud", "Security"]);
        assert!(head.get_all("keywords").is_empty());
    }

    #[test]
    fn sync_adds_ancestors_and_flags_excluded() {
        let mut head = head(&["Security", "Sponsored"]);
        let sync = sync_article_tags(&mut head, &store());

        assert_eq!(sync.added, vec!["Cloud".to_string()]);
        assert_eq!(sync.flagged, vec!["Sponsored".to_string()]);
        assert_eq!(head.get_all(ARTICLE_TAG), vec!["Security", "Cloud"]);
        assert_eq!(head.get("Sponsored").as_deref(), Some("true"));
    }

    #[test]
    fn sync_is_stable_on_second_run() {
        let store = store();
        let mut head = head(&["Security", "Sponsored"]);
        sync_article_tags(&mut head, &store);
        let once = head.clone();
        let sync = sync_article_tags(&mut head, &store);
        assert_eq!(sync, MetaSync::default());
        assert_eq!(head, once);
    }

    #[test]
    fn favicon_replaced() {
        let mut head = Head::default();
        head.set_favicon("/old.svg");
        head.set_favicon("/styles/favicon.svg");
        head.add_stylesheet("/styles/lazy-styles.css");
        head.add_stylesheet("/styles/lazy-styles.css");
        assert_eq!(head.links.len(), 2);
        assert_eq!(head.links[0].href, "/styles/favicon.svg");
    }
}
