//! Testing utilities for the blog decoration workspace
//!
//! In-memory fetcher, sample taxonomy and page fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use blog_core::{FetchError, FetchResult, Language, ResourceFetcher};
use blog_page::{Inline, Main, MetaTag, Node, Page, Picture, Section, ARTICLE_TAG};
use blog_taxonomy::{TaxonomySheet, TaxonomyStore};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Fetcher answering from a path → body map, recording every request
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    resources: Mutex<HashMap<String, String>>,
    failing: Mutex<Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path`
    pub fn with(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    /// Answer `path` with a server error
    pub fn failing(self, path: impl Into<String>) -> Self {
        self.failing.lock().push(path.into());
        self
    }

    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) {
        self.resources.lock().insert(path.into(), body.into());
    }

    /// Every path requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl ResourceFetcher for MemoryFetcher {
    async fn fetch_text(&self, path: &str) -> FetchResult<Option<String>> {
        self.requests.lock().push(path.to_string());
        if self.failing.lock().iter().any(|p| p == path) {
            return Err(FetchError::Status {
                url: path.to_string(),
                status: 500,
            });
        }
        Ok(self.resources.lock().get(path).cloned())
    }
}

/// English taxonomy sheet: Cloud > Security, hidden Products > Analytics,
/// Sponsored kept out of metadata
pub const SAMPLE_TAXONOMY: &str = r#"{ "data": [
    { "Level 1": "Cloud", "Link": "/en/topics/cloud" },
    { "Level 1": "Cloud", "Level 2": "Security", "Link": "/en/topics/security" },
    { "Level 1": "Products", "Hidden": "x" },
    { "Level 1": "Products", "Level 2": "Analytics", "Link": "/en/topics/analytics" },
    { "Level 1": "Sponsored", "Exclude From Metadata": "x" }
] }"#;

/// Path of the English taxonomy sheet
pub const SAMPLE_TAXONOMY_PATH: &str = "/en/topics/_taxonomy.json";

pub fn sample_store() -> TaxonomyStore {
    TaxonomySheet::parse(SAMPLE_TAXONOMY)
        .unwrap()
        .into_store(Language::En)
}

/// Fetcher serving the sample taxonomy
pub fn taxonomy_fetcher() -> MemoryFetcher {
    MemoryFetcher::new().with(SAMPLE_TAXONOMY_PATH, SAMPLE_TAXONOMY)
}

/// Article page with a title, a picture with caption and body text, tagged
/// with `tags`
pub fn article_page(path: &str, tags: &[&str]) -> Page {
    let mut page = Page::new(path);
    page.head.push(MetaTag::named("publication-date", "2023-05-01"));
    page.head.push(MetaTag::named("author", "Jane Doe"));
    for tag in tags {
        page.head.push(MetaTag::property(ARTICLE_TAG, *tag));
    }
    page.main = Some(Main::new(vec![Section::new(vec![
        Node::heading(1, "Securing the cloud"),
        Node::paragraph(vec![Inline::Picture(Picture::new("/media/cloud.png", "Cloud"))]),
        Node::paragraph(vec![Inline::Emphasis {
            content: vec![Inline::text("Image credit")],
        }]),
        Node::text("Body text."),
    ])]));
    page
}

/// Query index page JSON for articles `(path, title, tags)`
pub fn index_json(offset: usize, total: usize, articles: &[(&str, &str, &str)]) -> String {
    let data: Vec<_> = articles
        .iter()
        .map(|(path, title, tags)| {
            serde_json::json!({
                "path": path,
                "title": title,
                "description": format!("About {title}"),
                "date": "45047",
                "tags": tags,
            })
        })
        .collect();
    serde_json::json!({
        "offset": offset,
        "limit": articles.len(),
        "total": total,
        "data": data,
    })
    .to_string()
}
