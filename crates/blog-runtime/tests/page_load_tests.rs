//! Full page loads against in-memory site content

use blog_page::{Anchor, Block, Inline, LoadStatus, Node, Section, ARTICLE_TAG};
use blog_runtime::{
    ArticleHistory, FileHistoryStore, LoadPhase, PageLoader, RecordingInjector, RuntimeConfig,
};
use blog_core::Language;
use blog_test_utils::{article_page, taxonomy_fetcher, MemoryFetcher};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const FEATURED: &str = r#"<html><head>
    <meta property="og:title" content="Zero trust | Adobe Blog">
    <meta name="publication-date" content="2023-05-01">
    <meta property="og:image" content="/media/zt.png">
    <meta property="article:tag" content="Security">
    </head></html>"#;

fn featured_block() -> Section {
    Section::new(vec![Node::Block(Block::single(
        "Featured Articles",
        vec![Node::paragraph(vec![Inline::Link(Anchor::new(
            "https://blog.example.com/en/publish/zt",
            "Zero trust",
        ))])],
    ))])
}

fn category_anchor(block: &Block) -> Anchor {
    let Node::Paragraph { content, .. } = &block.rows[0][1][0] else {
        panic!("expected category paragraph");
    };
    let Inline::Link(anchor) = &content[0] else {
        panic!("expected category link");
    };
    anchor.clone()
}

#[tokio::test(start_paused = true)]
async fn featured_card_category_fixed_after_taxonomy() {
    let fetcher = taxonomy_fetcher().with("/en/publish/zt?noredirect", FEATURED);
    let injector = Arc::new(RecordingInjector::new());
    let loader = PageLoader::new(RuntimeConfig::default(), Arc::new(fetcher))
        .with_injector(injector.clone());

    let mut page = article_page("/en/publish/post", &["Security"]);
    page.main.as_mut().unwrap().sections.push(featured_block());

    let load = loader.load(&mut page).await.unwrap();
    assert_eq!(load.report.taxonomy, "loaded");
    // article header category and featured card category
    assert_eq!(load.report.links_fixed, 2);

    let main = page.main.as_ref().unwrap();
    let featured = main.find_block("featured-articles").unwrap();
    assert_eq!(featured.status, LoadStatus::Loaded);
    let anchor = category_anchor(featured);
    assert_eq!(anchor.href, "/en/topics/security");
    assert_eq!(anchor.topic_link, None);

    // ancestors synchronised into metadata
    assert_eq!(page.head.get_all(ARTICLE_TAG), vec!["Security", "Cloud"]);
    assert!(main.has_block("tags"));

    // delayed work waits for its timer
    assert!(injector.checkpoints().is_empty());
    tokio::time::sleep(Duration::from_secs(3)).await;
    load.delayed.await.unwrap();
    assert_eq!(injector.checkpoints(), vec!["cwv"]);
    assert_eq!(
        injector.scripts(),
        vec![RuntimeConfig::default().analytics.scripts.dev]
    );
    assert_eq!(load.report.phases.last(), Some(&LoadPhase::Done));
}

#[tokio::test]
async fn unavailable_taxonomy_leaves_placeholder_links() {
    let fetcher = MemoryFetcher::new()
        .failing("/en/topics/_taxonomy.json")
        .with("/en/publish/zt?noredirect", FEATURED);
    let loader = PageLoader::new(RuntimeConfig::default(), Arc::new(fetcher));

    let mut page = article_page("/en/publish/post", &["Security"]);
    page.main.as_mut().unwrap().sections.push(featured_block());

    let load = loader.load(&mut page).await.unwrap();
    assert_eq!(load.report.taxonomy, "unavailable");

    let featured = page.main.as_ref().unwrap().find_block("featured-articles").unwrap();
    let anchor = category_anchor(featured);
    assert_eq!(anchor.href, "#");
    assert_eq!(anchor.topic_link, None);
    assert_eq!(page.head.get_all(ARTICLE_TAG), vec!["Security"]);
}

#[tokio::test]
async fn history_persisted_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let config = RuntimeConfig::default().with_history_file(&path);

    for post in ["/en/publish/one", "/en/publish/two"] {
        let loader = PageLoader::new(config.clone(), Arc::new(taxonomy_fetcher()));
        let mut page = article_page(post, &["Cloud"]);
        loader.load(&mut page).await.unwrap();
    }

    let history = ArticleHistory::new(Arc::new(FileHistoryStore::new(&path)));
    let paths: Vec<_> = history
        .entries(Language::En)
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(paths, vec!["/en/publish/two", "/en/publish/one"]);
}
