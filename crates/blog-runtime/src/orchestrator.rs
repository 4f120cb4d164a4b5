//! Page load orchestration
//!
//! [`PageLoader::load`] takes a page through its phases:
//!
//! - eager: decorate `main`, mark the body as appearing, load the LCP block
//!   and wait for the LCP signal
//! - lazy: load header, blocks and footer, then the taxonomy, then everything
//!   that needs it (link fixup, metadata sync, tags block), then the
//!   highlight section
//! - delayed: schedule analytics on a timer without waiting for it
//!
//! Taxonomy and block failures degrade the page; they never abort the load.

use crate::config::RuntimeConfig;
use crate::delayed::schedule_delayed;
use crate::error::RuntimeResult;
use crate::history::{ArticleHistory, FileHistoryStore, HistoryStore, MemoryHistoryStore};
use crate::hooks::{BlockContext, BlockRuntime, RecordingInjector, ScriptInjector, SiteBlockRuntime};
use crate::phase::{LoadPhase, PhaseTracker};
use blog_core::{to_class_name, Language, ResourceFetcher};
use blog_page::{
    build_highlight_section, build_tags_block, decorate_main, fixup_topic_links,
    sync_article_tags, AutoBlockReport, Block, LoadStatus, MetaSync, Page, ARTICLE_TAG,
};
use blog_taxonomy::{TaxonomyHandle, TaxonomyLoader, TaxonomyState};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Body class revealing the page once decorated
pub const APPEAR_CLASS: &str = "appear";

/// What a page load did
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Phases entered, in order
    pub phases: Vec<LoadPhase>,
    /// Blocks synthesised while decorating `main`
    pub auto_blocks: AutoBlockReport,
    /// Block loaded during the eager phase
    pub lcp_block: Option<String>,
    /// Blocks loaded, in load order
    pub blocks_loaded: Vec<String>,
    /// Blocks whose loading failed
    pub block_failures: Vec<String>,
    /// `loaded` or `unavailable`
    pub taxonomy: &'static str,
    /// Deferred topic links resolved after the taxonomy settled
    pub links_fixed: usize,
    /// Metadata changes, when the taxonomy loaded
    pub meta: Option<MetaSync>,
    /// A tags block was built and loaded
    pub tags_block: bool,
    /// New post alerts in the highlight section, on `fact-box` pages
    pub highlight_alerts: Option<usize>,
    /// The page was added to the article history
    pub history_recorded: bool,
}

/// A finished page load
#[derive(Debug)]
pub struct PageLoad {
    /// What the load did
    pub report: LoadReport,
    /// Delayed work, still pending when the load returns
    pub delayed: JoinHandle<()>,
}

/// Loads pages through the eager, lazy and delayed phases
///
/// The taxonomy handle is settled at most once; a loader serves one page view.
pub struct PageLoader {
    config: RuntimeConfig,
    fetcher: Arc<dyn ResourceFetcher>,
    blocks: Arc<dyn BlockRuntime>,
    injector: Arc<dyn ScriptInjector>,
    history: ArticleHistory,
    taxonomy: TaxonomyHandle,
}

impl PageLoader {
    /// Create loader with the site block runtime and configured history
    #[must_use]
    pub fn new(config: RuntimeConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let store: Arc<dyn HistoryStore> = match &config.history_file {
            Some(path) => Arc::new(FileHistoryStore::new(path.clone())),
            None => Arc::new(MemoryHistoryStore::new()),
        };
        Self {
            blocks: Arc::new(SiteBlockRuntime::from_config(&config, Arc::clone(&fetcher))),
            injector: Arc::new(RecordingInjector::new()),
            history: ArticleHistory::new(store).with_depth(config.history_depth),
            taxonomy: TaxonomyHandle::new(),
            fetcher,
            config,
        }
    }

    /// Create loader fetching from the configured origin or content root
    ///
    /// # Errors
    /// Returns `RuntimeError::Fetch` if the origin is not a valid URL
    pub fn from_config(config: RuntimeConfig) -> RuntimeResult<Self> {
        let fetcher = config.fetcher()?;
        Ok(Self::new(config, fetcher))
    }

    /// With a block runtime
    #[must_use]
    pub fn with_blocks(mut self, blocks: Arc<dyn BlockRuntime>) -> Self {
        self.blocks = blocks;
        self
    }

    /// With a script injector
    #[must_use]
    pub fn with_injector(mut self, injector: Arc<dyn ScriptInjector>) -> Self {
        self.injector = injector;
        self
    }

    /// With a reading history
    #[must_use]
    pub fn with_history(mut self, history: ArticleHistory) -> Self {
        self.history = history;
        self
    }

    /// With a taxonomy handle, possibly already settled
    #[must_use]
    pub fn with_taxonomy(mut self, handle: TaxonomyHandle) -> Self {
        self.taxonomy = handle;
        self
    }

    /// Taxonomy handle of this page view
    #[inline]
    #[must_use]
    pub fn taxonomy(&self) -> &TaxonomyHandle {
        &self.taxonomy
    }

    /// Reading history
    #[inline]
    #[must_use]
    pub fn history(&self) -> &ArticleHistory {
        &self.history
    }

    /// Runtime configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run every phase on `page`
    ///
    /// Returns once the lazy phase has finished and the delayed phase is
    /// scheduled.
    ///
    /// # Errors
    /// Returns `RuntimeError::IllegalTransition` if the phases get out of
    /// order; degraded content is reported, not returned
    pub async fn load(&self, page: &mut Page) -> RuntimeResult<PageLoad> {
        let mut tracker = PhaseTracker::new();
        let mut report = LoadReport::default();

        tracker.advance(LoadPhase::Eager)?;
        self.load_eager(page, &mut report).await;

        tracker.advance(LoadPhase::Lazy)?;
        self.load_lazy(page, &mut report).await;

        tracker.advance(LoadPhase::Delayed)?;
        let delayed = schedule_delayed(
            self.config.delay(),
            Arc::clone(&self.injector),
            self.config.analytics.clone(),
            self.config.origin.clone(),
        );

        tracker.advance(LoadPhase::Done)?;
        report.phases = tracker.visited().to_vec();
        Ok(PageLoad { report, delayed })
    }

    async fn load_eager(&self, page: &mut Page, report: &mut LoadReport) {
        let language = page.language();
        page.lang = Some(language.code().to_string());
        decorate_template_and_theme(page);
        if page.main.is_none() {
            return;
        }

        report.auto_blocks = decorate_main(page, self.taxonomy.store());
        page.add_body_class(APPEAR_CLASS);
        report.lcp_block = self.load_lcp_block(page, language, report).await;
        self.blocks.wait_for_lcp(page).await;

        if report.auto_blocks.article_header {
            let tags = page.head.get(ARTICLE_TAG).unwrap_or_default();
            match self.history.record(language, &page.path, &tags) {
                Ok(()) => report.history_recorded = true,
                Err(e) => tracing::warn!("Could not record article history: {}", e),
            }
        }
    }

    /// Load the first block when it is an LCP block
    async fn load_lcp_block(
        &self,
        page: &mut Page,
        language: Language,
        report: &mut LoadReport,
    ) -> Option<String> {
        let ctx = BlockContext {
            page_path: &page.path,
            language,
            store: self.taxonomy.store(),
        };
        let main = page.main.as_mut()?;
        let (id, name) = main
            .blocks()
            .next()
            .map(|(id, block)| (id, block.name.clone()))?;
        if !self.config.lcp_blocks.contains(&name) {
            return None;
        }
        let block = main.block_mut(id)?;
        self.load_block(block, &ctx, report).await;
        Some(name)
    }

    async fn load_lazy(&self, page: &mut Page, report: &mut LoadReport) {
        let language = page.language();
        let gnav_source = page
            .head
            .get("gnav")
            .unwrap_or_else(|| format!("{}/gnav", language.root_path()));

        {
            let ctx = BlockContext {
                page_path: &page.path,
                language,
                store: self.taxonomy.store(),
            };
            if let Some(header) = page.header.as_mut() {
                header.name = "gnav".to_string();
                header.attributes.insert("data-gnav-source".to_string(), gnav_source);
                self.load_block(header, &ctx, report).await;
            }
            if let Some(main) = page.main.as_mut() {
                let ids: Vec<_> = main.blocks().map(|(id, _)| id).collect();
                for id in ids {
                    if let Some(block) = main.block_mut(id) {
                        if block.status != LoadStatus::Loaded {
                            self.load_block(block, &ctx, report).await;
                        }
                    }
                }
            }
            if let Some(footer) = page.footer.as_mut() {
                self.load_block(footer, &ctx, report).await;
            }
        }

        let state = TaxonomyLoader::new(Arc::clone(&self.fetcher))
            .load_into(&self.taxonomy, language)
            .await;
        report.taxonomy = match state {
            TaxonomyState::Loaded(_) => "loaded",
            TaxonomyState::NotLoaded | TaxonomyState::Unavailable => "unavailable",
        };
        let store = self.taxonomy.store();

        report.links_fixed = fixup_topic_links(page, store);
        if let Some(store) = store {
            report.meta = Some(sync_article_tags(&mut page.head, store));
        }

        if let Some(id) = build_tags_block(page, store) {
            report.tags_block = true;
            let ctx = BlockContext {
                page_path: &page.path,
                language,
                store,
            };
            if let Some(block) = page.main.as_mut().and_then(|main| main.block_mut(id)) {
                self.load_block(block, &ctx, report).await;
            }
        }
        report.highlight_alerts = build_highlight_section(page);

        page.head.add_stylesheet(&self.config.asset_path("/styles/lazy-styles.css"));
        page.head.set_favicon(&self.config.asset_path("/styles/favicon.svg"));
    }

    async fn load_block(&self, block: &mut Block, ctx: &BlockContext<'_>, report: &mut LoadReport) {
        block.status = LoadStatus::Loading;
        if let Err(e) = self.blocks.load_block(block, ctx).await {
            tracing::warn!("failed to load block {}: {}", block.name, e);
            report.block_failures.push(block.name.clone());
        }
        block.status = LoadStatus::Loaded;
        report.blocks_loaded.push(block.name.clone());
    }
}

impl std::fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("config", &self.config)
            .field("history", &self.history)
            .field("taxonomy", &self.taxonomy.state())
            .finish_non_exhaustive()
    }
}

/// Body classes from the `template` and `theme` metadata
fn decorate_template_and_theme(page: &mut Page) {
    let mut classes = Vec::new();
    if let Some(template) = page.head.get("template") {
        classes.push(to_class_name(&template));
    }
    classes.extend(page.head.get_all("theme").iter().map(|t| to_class_name(t)));
    for class in classes.iter().filter(|c| !c.is_empty()) {
        page.add_body_class(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blog_page::{Inline, Main, MetaTag, Node, Picture, Section};
    use blog_test_utils::{article_page, taxonomy_fetcher, MemoryFetcher};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    /// Records load order and whether the taxonomy was settled at each load
    #[derive(Default)]
    struct TrackingBlocks {
        loads: Mutex<Vec<(String, bool)>>,
        fail: Option<&'static str>,
    }

    #[async_trait]
    impl BlockRuntime for TrackingBlocks {
        async fn load_block(&self, block: &mut Block, ctx: &BlockContext<'_>) -> RuntimeResult<()> {
            self.loads.lock().push((block.name.clone(), ctx.store.is_some()));
            if self.fail == Some(block.name.as_str()) {
                return Err(crate::error::RuntimeError::block(block.name.as_str(), "boom"));
            }
            Ok(())
        }
    }

    fn loader(fetcher: MemoryFetcher, blocks: Arc<TrackingBlocks>) -> PageLoader {
        PageLoader::new(RuntimeConfig::default(), Arc::new(fetcher)).with_blocks(blocks)
    }

    #[tokio::test]
    async fn blocks_load_before_taxonomy() {
        let blocks = Arc::new(TrackingBlocks::default());
        let loader = loader(taxonomy_fetcher(), blocks.clone());
        let mut page = article_page("/en/publish/post", &["Security"]);
        page.header = Some(Block::new("header", Vec::new()));
        page.footer = Some(Block::new("footer", Vec::new()));

        let load = loader.load(&mut page).await.unwrap();

        let loads = blocks.loads.lock().clone();
        assert_eq!(loads.first(), Some(&("gnav".to_string(), false)));
        assert_eq!(loads.last(), Some(&("tags".to_string(), true)));
        assert!(loads[..loads.len() - 1].iter().all(|(_, settled)| !settled));
        assert_eq!(load.report.taxonomy, "loaded");
        assert_eq!(
            load.report.phases,
            vec![LoadPhase::Eager, LoadPhase::Lazy, LoadPhase::Delayed, LoadPhase::Done]
        );
        assert_eq!(
            page.header.as_ref().unwrap().attributes["data-gnav-source"],
            "/en/gnav"
        );
    }

    #[tokio::test]
    async fn lcp_block_loads_eagerly_once() {
        let blocks = Arc::new(TrackingBlocks::default());
        let config = RuntimeConfig::default().with_lcp_blocks(["hero"]);
        let loader = PageLoader::new(config, Arc::new(MemoryFetcher::new())).with_blocks(blocks.clone());
        let mut page = Page::new("/en/landing");
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::paragraph(vec![Inline::Picture(Picture::new("/media/hero.png", "Hero"))]),
            Node::heading(1, "Welcome"),
            Node::text("Body text."),
        ])]));

        let load = loader.load(&mut page).await.unwrap();

        assert_eq!(load.report.auto_blocks.built.first(), Some(&"hero"));
        assert_eq!(load.report.lcp_block.as_deref(), Some("hero"));
        let hero_loads = blocks.loads.lock().iter().filter(|(n, _)| n == "hero").count();
        assert_eq!(hero_loads, 1);
        assert!(page.has_body_class(APPEAR_CLASS));
    }

    #[tokio::test]
    async fn block_failure_degrades_only_that_block() {
        let blocks = Arc::new(TrackingBlocks {
            fail: Some("article-header"),
            ..TrackingBlocks::default()
        });
        let loader = loader(taxonomy_fetcher(), blocks);
        let mut page = article_page("/en/publish/post", &["Security"]);

        let load = loader.load(&mut page).await.unwrap();

        assert_eq!(load.report.block_failures, vec!["article-header"]);
        let header = page.main.as_ref().unwrap().find_block("article-header").unwrap();
        assert_eq!(header.status, LoadStatus::Loaded);
        assert!(load.report.tags_block);
    }

    #[tokio::test]
    async fn missing_taxonomy_falls_back() {
        let loader = loader(MemoryFetcher::new(), Arc::new(TrackingBlocks::default()));
        let mut page = article_page("/en/publish/post", &["Security"]);

        let load = loader.load(&mut page).await.unwrap();

        assert_eq!(load.report.taxonomy, "unavailable");
        assert_eq!(load.report.links_fixed, 1);
        assert!(load.report.meta.is_none());
        assert!(!load.report.tags_block);
        assert!(loader.taxonomy().is_settled());
    }

    #[tokio::test]
    async fn article_pages_recorded_in_history() {
        let loader = loader(taxonomy_fetcher(), Arc::new(TrackingBlocks::default()));
        let mut page = article_page("/en/publish/post", &["Security", "Cloud"]);
        let load = loader.load(&mut page).await.unwrap();
        assert!(load.report.history_recorded);

        let entries = loader.history().entries(Language::En).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/en/publish/post");
        assert_eq!(entries[0].tags, "Security, Cloud");
    }

    #[tokio::test]
    async fn fact_box_template_gets_highlight_first() {
        let loader = loader(taxonomy_fetcher(), Arc::new(TrackingBlocks::default()));
        let mut page = Page::new("/en/weekly");
        page.head.push(MetaTag::named("template", "Fact Box"));
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "Zero Trust :new:"),
            Node::text("Body text."),
        ])]));

        let load = loader.load(&mut page).await.unwrap();

        assert_eq!(load.report.highlight_alerts, Some(1));
        let first = &page.main.as_ref().unwrap().sections[0];
        assert_eq!(first.attributes["id"], "highlight");
        assert!(first.nodes[0].text_content().contains("\"Zero Trust\" section"));
    }

    #[tokio::test]
    async fn page_without_main_only_gets_lazy_assets() {
        let loader = loader(taxonomy_fetcher(), Arc::new(TrackingBlocks::default()));
        let mut page = Page::new("/de/legal");
        page.main = None;
        page.head.push(MetaTag::named("template", "Legal Page"));
        page.head.push(MetaTag::named("theme", "dark, Wide"));

        let load = loader.load(&mut page).await.unwrap();

        assert_eq!(page.lang.as_deref(), Some("de"));
        assert_eq!(page.body_classes, vec!["legal-page", "dark", "wide"]);
        assert!(!page.has_body_class(APPEAR_CLASS));
        assert_eq!(page.head.links.len(), 2);
        assert!(!load.report.history_recorded);
    }

    #[tokio::test]
    async fn topic_page_decorated() {
        let loader = loader(taxonomy_fetcher(), Arc::new(TrackingBlocks::default()));
        let mut page = Page::new("/en/topics/cloud");
        page.main = Some(Main::new(vec![Section::new(vec![Node::heading(1, "Cloud")])]));

        let load = loader.load(&mut page).await.unwrap();

        assert!(load.report.blocks_loaded.contains(&"article-feed".to_string()));
        assert!(!load.report.history_recorded);
    }
}
