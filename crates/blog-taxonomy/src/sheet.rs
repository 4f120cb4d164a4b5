//! Taxonomy spreadsheet format
//!
//! The taxonomy is authored as a sheet and published as JSON:
//!
//! ```json
//! { "data": [
//!   { "Level 1": "Cloud", "Level 2": "", "Level 3": "", "Link": "", "Hidden": "", "Exclude From Metadata": "" },
//!   { "Level 1": "Cloud", "Level 2": "Security", "Level 3": "", "Link": "https://blog.example.com/en/topics/security", "Hidden": "", "Exclude From Metadata": "" }
//! ] }
//! ```
//!
//! The deepest non-empty level names the topic, the shallower levels are its
//! parents. Any value in `Hidden` hides the topic, any value in
//! `Exclude From Metadata` keeps it out of page metadata.

use crate::error::TaxonomyResult;
use crate::store::TaxonomyStore;
use crate::topic::Topic;
use blog_core::{to_class_name, Language};
use serde::Deserialize;

/// One row of the taxonomy sheet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomyRow {
    /// Top level topic
    #[serde(rename = "Level 1", default)]
    pub level1: String,
    /// Second level topic
    #[serde(rename = "Level 2", default)]
    pub level2: String,
    /// Third level topic
    #[serde(rename = "Level 3", default)]
    pub level3: String,
    /// Topic page link
    #[serde(rename = "Link", default)]
    pub link: String,
    /// Non-empty when the topic is hidden
    #[serde(rename = "Hidden", default)]
    pub hidden: String,
    /// Non-empty when the topic is kept out of metadata
    #[serde(rename = "Exclude From Metadata", default)]
    pub exclude_from_metadata: String,
}

impl TaxonomyRow {
    /// Non-empty levels, outermost first
    fn levels(&self) -> Vec<&str> {
        [&self.level1, &self.level2, &self.level3]
            .into_iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Published taxonomy sheet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomySheet {
    /// Sheet rows
    #[serde(default)]
    pub data: Vec<TaxonomyRow>,
}

impl TaxonomySheet {
    /// Parse sheet JSON
    ///
    /// # Errors
    /// Returns `TaxonomyError::Parse` if the JSON does not match the sheet shape
    pub fn parse(json: &str) -> TaxonomyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the store for a language
    ///
    /// Rows without any level are ignored and the first row naming a topic
    /// wins. Ancestors that never get a row of their own are added as plain
    /// visible topics with a derived link.
    #[must_use]
    pub fn into_store(self, language: Language) -> TaxonomyStore {
        let mut store = TaxonomyStore::new(language);
        let mut implicit: Vec<String> = Vec::new();

        for (idx, row) in self.data.iter().enumerate() {
            let levels = row.levels();
            let Some((name, parents)) = levels.split_last() else {
                tracing::debug!(row = idx, "skipping taxonomy row without levels");
                continue;
            };

            let mut topic = Topic::new(*name, normalize_link(&row.link, name, language));
            if !row.hidden.trim().is_empty() {
                topic = topic.hidden();
            }
            if !row.exclude_from_metadata.trim().is_empty() {
                topic = topic.skipped_in_meta();
            }

            if let Err(e) = store.insert_with_parents(topic, parents.iter().copied()) {
                tracing::debug!(row = idx, "ignoring taxonomy row: {}", e);
                continue;
            }
            implicit.extend(parents.iter().map(|p| (*p).to_string()));
        }

        for name in implicit {
            if !store.contains(&name) {
                let link = normalize_link("", &name, language);
                // cannot collide, checked above
                let _ = store.insert(Topic::new(name, link));
            }
        }

        store
    }
}

/// Reduce an authored link to a site path, deriving one when empty
fn normalize_link(link: &str, name: &str, language: Language) -> String {
    let link = link.trim();
    if link.is_empty() {
        return format!("{}/topics/{}", language.root_path(), to_class_name(name));
    }
    match link.split_once("://") {
        Some((_, rest)) => rest
            .find('/')
            .map_or_else(|| "/".to_string(), |idx| rest[idx..].to_string()),
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = r#"{
        "total": 5,
        "data": [
            { "Level 1": "Cloud", "Level 2": "", "Level 3": "", "Link": "", "Hidden": "", "Exclude From Metadata": "" },
            { "Level 1": "Cloud", "Level 2": "Security", "Level 3": "", "Link": "https://blog.example.com/en/topics/cloud-security", "Hidden": "", "Exclude From Metadata": "" },
            { "Level 1": "Cloud", "Level 2": "Security", "Level 3": "Zero Trust", "Link": "/en/topics/zero-trust", "Hidden": "x", "Exclude From Metadata": "" },
            { "Level 1": "Internal", "Level 2": "Partner Content", "Level 3": "", "Link": "", "Hidden": "x", "Exclude From Metadata": "x" },
            { "Level 1": "", "Level 2": "", "Level 3": "", "Link": "", "Hidden": "", "Exclude From Metadata": "" }
        ]
    }"#;

    #[test]
    fn sheet_builds_store() {
        let store = TaxonomySheet::parse(SHEET).unwrap().into_store(Language::En);

        let cloud = store.get("Cloud").unwrap();
        assert_eq!(cloud.link, "/en/topics/cloud");
        assert!(cloud.is_visible);

        let security = store.get("Security").unwrap();
        assert_eq!(security.link, "/en/topics/cloud-security");
        assert_eq!(store.parents("Security").unwrap(), ["Cloud".to_string()]);

        let zero_trust = store.get("Zero Trust").unwrap();
        assert!(!zero_trust.is_visible);
        assert_eq!(
            store.parents("Zero Trust").unwrap(),
            ["Cloud".to_string(), "Security".to_string()]
        );
    }

    #[test]
    fn excluded_rows_flagged() {
        let store = TaxonomySheet::parse(SHEET).unwrap().into_store(Language::En);
        let partner = store.get("Partner Content").unwrap();
        assert!(partner.skip_in_meta);
        assert!(!partner.is_visible);
    }

    #[test]
    fn implicit_parent_added() {
        let store = TaxonomySheet::parse(SHEET).unwrap().into_store(Language::En);
        let internal = store.get("Internal").unwrap();
        assert_eq!(internal.link, "/en/topics/internal");
        assert!(internal.is_visible);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn first_row_wins() {
        let json = r#"{ "data": [
            { "Level 1": "AI", "Link": "/en/topics/ai" },
            { "Level 1": "AI", "Link": "/en/topics/other" }
        ] }"#;
        let store = TaxonomySheet::parse(json).unwrap().into_store(Language::En);
        assert_eq!(store.get("AI").unwrap().link, "/en/topics/ai");
    }

    #[test]
    fn invalid_sheet_is_error() {
        assert!(TaxonomySheet::parse("not json").is_err());
        assert!(TaxonomySheet::parse(r#"{ "data": 3 }"#).is_err());
    }

    #[test]
    fn normalize_links() {
        assert_eq!(
            normalize_link("https://blog.example.com/de/topics/ki", "KI", Language::De),
            "/de/topics/ki"
        );
        assert_eq!(normalize_link("https://blog.example.com", "X", Language::En), "/");
        assert_eq!(normalize_link("", "Digital Media", Language::Fr), "/fr/topics/digital-media");
    }
}
