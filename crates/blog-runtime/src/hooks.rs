//! Block loading and script injection
//!
//! The orchestrator drives blocks and scripts through these traits so the
//! environment (a browser bridge, a static renderer, a test) decides what
//! loading means. [`SiteBlockRuntime`] renders the blocks the blog itself
//! fills from content: featured articles and article feeds.

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use async_trait::async_trait;
use blog_core::{Language, ResourceFetcher};
use blog_index::{build_article_card, featured_cards, ArticleCard, ArticleIndex, ArticleLookup};
use blog_page::{Anchor, Block, Inline, Node, Page, Picture};
use blog_taxonomy::{Article, TaxonomyStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// What a block sees of the page while loading
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    /// Site path of the page
    pub page_path: &'a str,
    /// Language of the page
    pub language: Language,
    /// Taxonomy store, `None` until it has loaded
    pub store: Option<&'a TaxonomyStore>,
}

impl BlockContext<'_> {
    /// Locale dates on this page are formatted in
    #[inline]
    #[must_use]
    pub fn date_locale(&self) -> &'static str {
        self.language.date_locale(self.page_path)
    }
}

/// Loads decorated blocks
#[async_trait]
pub trait BlockRuntime: Send + Sync {
    /// Load one block; the orchestrator tracks its status
    async fn load_block(&self, block: &mut Block, ctx: &BlockContext<'_>) -> RuntimeResult<()>;

    /// Resolve once the largest contentful paint candidate has rendered
    async fn wait_for_lcp(&self, _page: &Page) {}
}

/// Injects scripts and records sampling checkpoints
#[async_trait]
pub trait ScriptInjector: Send + Sync {
    /// Load a script, resolving when it has loaded
    async fn inject_script(&self, url: &str) -> RuntimeResult<()>;

    /// Record a sampling checkpoint such as `cwv`
    fn sample_rum(&self, checkpoint: &str);
}

/// Injector that only records what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingInjector {
    scripts: Mutex<Vec<String>>,
    checkpoints: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingInjector {
    /// Create recording injector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Injector whose scripts all fail to load
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Scripts injected so far
    #[must_use]
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }

    /// Checkpoints sampled so far
    #[must_use]
    pub fn checkpoints(&self) -> Vec<String> {
        self.checkpoints.lock().clone()
    }
}

#[async_trait]
impl ScriptInjector for RecordingInjector {
    async fn inject_script(&self, url: &str) -> RuntimeResult<()> {
        self.scripts.lock().push(url.to_string());
        if self.failing {
            return Err(RuntimeError::script(url, "load error"));
        }
        Ok(())
    }

    fn sample_rum(&self, checkpoint: &str) {
        self.checkpoints.lock().push(checkpoint.to_string());
    }
}

/// Card type of article feed entries
pub const FEED_CARD_TYPE: &str = "article";

/// Block runtime for the blog's content-driven blocks
///
/// Other blocks load as no-ops.
pub struct SiteBlockRuntime {
    fetcher: Arc<dyn ResourceFetcher>,
    lookup: ArticleLookup,
    indexes: Mutex<HashMap<Language, Arc<ArticleIndex>>>,
    index_page_size: usize,
    origin: String,
}

impl SiteBlockRuntime {
    /// Create runtime reading content through `fetcher`
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, origin: impl Into<String>) -> Self {
        Self {
            lookup: ArticleLookup::new(Arc::clone(&fetcher)),
            fetcher,
            indexes: Mutex::new(HashMap::new()),
            index_page_size: blog_index::PAGE_SIZE,
            origin: origin.into(),
        }
    }

    /// Create runtime with cache and paging from configuration
    #[must_use]
    pub fn from_config(config: &RuntimeConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let mut runtime = Self::new(fetcher, config.origin.clone());
        runtime.lookup = runtime.lookup.with_cache(config.article_cache());
        runtime.index_page_size = config.index_page_size;
        runtime
    }

    /// Article lookup shared by featured articles
    #[inline]
    #[must_use]
    pub fn lookup(&self) -> &ArticleLookup {
        &self.lookup
    }

    /// Query index of a language, created on first use
    #[must_use]
    pub fn index(&self, language: Language) -> Arc<ArticleIndex> {
        let mut indexes = self.indexes.lock();
        let index = indexes.entry(language).or_insert_with(|| {
            Arc::new(
                ArticleIndex::new(Arc::clone(&self.fetcher), language)
                    .with_page_size(self.index_page_size),
            )
        });
        Arc::clone(index)
    }

    async fn load_featured(&self, block: &mut Block, ctx: &BlockContext<'_>) {
        let mut hrefs = Vec::new();
        block.for_each_anchor_mut(|anchor| hrefs.push(anchor.href.clone()));
        let cards = featured_cards(
            &self.lookup,
            &hrefs,
            ctx.store,
            ctx.date_locale(),
            &self.origin,
        )
        .await;
        block.rows = cards.iter().map(card_row).collect();
    }

    async fn load_feed(&self, block: &mut Block, ctx: &BlockContext<'_>) -> RuntimeResult<()> {
        let (feed_type, value) = feed_config(block)
            .ok_or_else(|| RuntimeError::block(block.name.as_str(), "missing feed configuration"))?;
        let index = self.index(ctx.language);
        index
            .fetch_all()
            .await
            .map_err(|e| RuntimeError::block(block.name.as_str(), e.to_string()))?;

        let mut cards = Vec::new();
        index
            .for_each_article(|article| {
                if feed_matches(article, &feed_type, &value, ctx.store) {
                    cards.push(build_article_card(
                        article,
                        FEED_CARD_TYPE,
                        ctx.store,
                        ctx.date_locale(),
                    ));
                }
            })
            .await;
        tracing::debug!("Article feed {} '{}': {} cards", feed_type, value, cards.len());
        block.rows = cards.iter().map(card_row).collect();
        Ok(())
    }
}

#[async_trait]
impl BlockRuntime for SiteBlockRuntime {
    async fn load_block(&self, block: &mut Block, ctx: &BlockContext<'_>) -> RuntimeResult<()> {
        match block.name.as_str() {
            "featured-articles" => {
                self.load_featured(block, ctx).await;
                Ok(())
            }
            "article-feed" => self.load_feed(block, ctx).await,
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for SiteBlockRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteBlockRuntime")
            .field("lookup", &self.lookup)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Feed type and value from the first row of an article feed
fn feed_config(block: &Block) -> Option<(String, String)> {
    let row = block.rows.first()?;
    let text = |cell: &Vec<Node>| {
        cell.iter()
            .map(Node::text_content)
            .collect::<String>()
            .trim()
            .to_string()
    };
    let feed_type = text(row.first()?).to_lowercase();
    let value = row.get(1).map(text).unwrap_or_default();
    (!feed_type.is_empty()).then_some((feed_type, value))
}

fn feed_matches(
    article: &mut Article,
    feed_type: &str,
    value: &str,
    store: Option<&TaxonomyStore>,
) -> bool {
    match feed_type {
        "tags" => {
            let taxonomy = article.taxonomy(store);
            taxonomy
                .all_topics
                .as_ref()
                .unwrap_or(&taxonomy.topics)
                .iter()
                .any(|topic| topic.eq_ignore_ascii_case(value))
        }
        "author" => article.author.eq_ignore_ascii_case(value),
        other => {
            tracing::debug!("Unknown article feed type: {}", other);
            false
        }
    }
}

/// Block row rendering one card
///
/// The category anchor keeps its topic marker while the store is loading,
/// so link fixup resolves it later like any other deferred link.
fn card_row(card: &ArticleCard) -> Vec<Vec<Node>> {
    let paragraph = |part: &str, content: Vec<Inline>| Node::Paragraph {
        classes: vec![card.class(part)],
        content,
    };
    vec![
        vec![Node::Picture(Picture::new(&card.image, &card.image_alt))],
        vec![
            paragraph(
                "category",
                vec![Inline::Link(Anchor::from(card.category.clone()))],
            ),
            paragraph(
                "title",
                vec![Inline::Link(Anchor::new(&card.href, &card.title))],
            ),
            paragraph("description", vec![Inline::text(&card.description)]),
            paragraph("date", vec![Inline::text(&card.date)]),
        ],
    ]
}
