//! Article page decoration across the taxonomy load: deferred links in the
//! article header, then fixup, metadata sync and the tags block.

use blog_core::Language;
use blog_page::prelude::*;
use blog_page::{Anchor, Inline, MetaTag, Picture, ARTICLE_TAG};
use blog_taxonomy::{TaxonomyHandle, TaxonomySheet, UNRESOLVED_HREF};
use pretty_assertions::assert_eq;

const SHEET: &str = r#"{ "data": [
    { "Level 1": "Cloud" },
    { "Level 1": "Cloud", "Level 2": "Security" },
    { "Level 1": "Sponsored", "Exclude From Metadata": "x" }
] }"#;

fn article_page() -> Page {
    let mut page = Page::new("/en/publish/2023/post");
    page.head.push(MetaTag::named("publication-date", "05-01-2023"));
    page.head.push(MetaTag::named("author", "Jane Doe"));
    page.head.push(MetaTag::property(ARTICLE_TAG, "Security"));
    page.head.push(MetaTag::property(ARTICLE_TAG, "Sponsored"));
    page.main = Some(Main::new(vec![Section::new(vec![
        Node::heading(1, "Securing the cloud"),
        Node::paragraph(vec![Inline::Picture(Picture::new("/media/a.png", "a"))]),
        Node::text("Body"),
    ])]));
    page
}

fn anchors(page: &mut Page) -> Vec<Anchor> {
    let mut out = Vec::new();
    page.for_each_anchor_mut(|a| out.push(a.clone()));
    out
}

#[test]
fn deferred_category_link_fixed_after_load() {
    let handle = TaxonomyHandle::new();
    let mut page = article_page();
    decorate_main(&mut page, handle.store());
    assert_eq!(anchors(&mut page)[0].topic_link.as_deref(), Some("Security"));

    let store = TaxonomySheet::parse(SHEET).unwrap().into_store(Language::En);
    assert!(handle.settle(Some(store)));

    assert_eq!(fixup_topic_links(&mut page, handle.store()), 1);
    let category = &anchors(&mut page)[0];
    assert_eq!(category.href, "/en/topics/security");
    assert_eq!(category.topic_link, None);

    let sync = sync_article_tags(&mut page.head, handle.store().unwrap());
    assert_eq!(sync.added, vec!["Cloud".to_string()]);
    assert_eq!(sync.flagged, vec!["Sponsored".to_string()]);

    let id = build_tags_block(&mut page, handle.store()).unwrap();
    let main = page.main.as_mut().unwrap();
    assert_eq!(main.block_mut(id).unwrap().name, "tags");
}

#[test]
fn unavailable_taxonomy_degrades_links() {
    let handle = TaxonomyHandle::unavailable();
    let mut page = article_page();
    decorate_main(&mut page, handle.store());

    assert_eq!(fixup_topic_links(&mut page, handle.store()), 1);
    assert_eq!(anchors(&mut page)[0].href, UNRESOLVED_HREF);
    assert_eq!(build_tags_block(&mut page, handle.store()), None);
}

#[test]
fn decorated_page_survives_json() {
    let mut page = article_page();
    decorate_main(&mut page, None);
    let json = page.to_json().unwrap();
    assert_eq!(Page::from_json(&json).unwrap(), page);
}
