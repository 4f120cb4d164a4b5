//! Loaded taxonomy for one language
//!
//! Lookups are exact-match on the topic name. Parents are kept in a separate
//! table and answered on demand.

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::topic::Topic;
use blog_core::Language;
use indexmap::IndexMap;
use std::collections::HashMap;

/// All topics of a language, queryable by name
#[derive(Debug, Clone, Default)]
pub struct TaxonomyStore {
    language: Language,
    topics: IndexMap<String, Topic>,
    parents: HashMap<String, Vec<String>>,
}

impl TaxonomyStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            topics: IndexMap::new(),
            parents: HashMap::new(),
        }
    }

    /// Insert a topic
    ///
    /// # Errors
    /// Returns `TaxonomyError::DuplicateTopic` if the name is already present
    pub fn insert(&mut self, topic: Topic) -> TaxonomyResult<()> {
        if self.topics.contains_key(&topic.name) {
            return Err(TaxonomyError::DuplicateTopic(topic.name));
        }
        self.topics.insert(topic.name.clone(), topic);
        Ok(())
    }

    /// Insert a topic together with its parents (outermost first)
    ///
    /// # Errors
    /// Returns `TaxonomyError::DuplicateTopic` if the name is already present
    pub fn insert_with_parents<I, S>(&mut self, topic: Topic, parents: I) -> TaxonomyResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = topic.name.clone();
        self.insert(topic)?;
        let parents: Vec<String> = parents.into_iter().map(Into::into).collect();
        if !parents.is_empty() {
            self.parents.insert(name, parents);
        }
        Ok(())
    }

    /// Look up a topic by exact name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.get(name)
    }

    /// Parents of a topic, `None` for unknown topics
    #[must_use]
    pub fn parents(&self, name: &str) -> Option<&[String]> {
        if !self.topics.contains_key(name) {
            return None;
        }
        Some(self.parents.get(name).map(Vec::as_slice).unwrap_or_default())
    }

    /// Check whether a topic exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// Language the store was loaded for
    #[inline]
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Topics in sheet order
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Number of topics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if store has no topics
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaxonomyStore {
        let mut store = TaxonomyStore::new(Language::En);
        store
            .insert(Topic::new("Cloud", "/en/topics/cloud"))
            .unwrap();
        store
            .insert_with_parents(Topic::new("Security", "/en/topics/security"), ["Cloud"])
            .unwrap();
        store
    }

    #[test]
    fn get_is_exact_match() {
        let store = store();
        assert!(store.get("Security").is_some());
        assert!(store.get("security").is_none());
        assert!(store.get("Secur").is_none());
    }

    #[test]
    fn parents_known_and_unknown() {
        let store = store();
        assert_eq!(store.parents("Security"), Some(&["Cloud".to_string()][..]));
        assert_eq!(store.parents("Cloud"), Some(&[][..]));
        assert_eq!(store.parents("Nope"), None);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut store = store();
        let err = store
            .insert(Topic::new("Cloud", "/en/topics/other"))
            .unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateTopic(name) if name == "Cloud"));
        assert_eq!(store.get("Cloud").unwrap().link, "/en/topics/cloud");
    }

    #[test]
    fn topics_keep_insertion_order() {
        let store = store();
        let names: Vec<_> = store.topics().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Cloud", "Security"]);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
