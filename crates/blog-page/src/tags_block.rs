//! Tags block
//!
//! Built after the taxonomy has loaded: one link per visible topic of the
//! page's tags, parents included.

use crate::document::{Block, BlockId, Inline, Node, Page};
use crate::metadata::ARTICLE_TAG;
use crate::sections::decorate_block;
use blog_taxonomy::{compute_taxonomy, link_for_topic, TaxonomyStore};

/// Section class marking the recommended articles
const RECOMMENDED_CONTAINER: &str = "recommended-articles-container";

/// Build the tags block and place it in `main`
///
/// Nothing is built without a store or without tags. The block goes at the
/// end of the section before the recommended articles, or at the end of the
/// last section. Returns where it was placed so it can be loaded.
pub fn build_tags_block(page: &mut Page, store: Option<&TaxonomyStore>) -> Option<BlockId> {
    let store = store?;
    let topics = page.head.get_all(ARTICLE_TAG);
    if topics.is_empty() {
        return None;
    }

    let taxonomy = compute_taxonomy(&topics, Some(store), Some(&page.path));
    let links: Vec<Inline> = taxonomy
        .visible_topics
        .unwrap_or_default()
        .iter()
        .map(|topic| Inline::Link(link_for_topic(topic, Some(store), None).into()))
        .collect();

    let main = page.main.as_mut()?;
    let section = match main.section_with_class(RECOMMENDED_CONTAINER) {
        Some(0) => return None,
        Some(i) => i - 1,
        None => main.sections.len().checked_sub(1)?,
    };

    let mut block = Block::single("tags", vec![Node::paragraph(links)]);
    decorate_block(&mut block);
    let nodes = &mut main.sections[section].nodes;
    nodes.push(Node::Block(block));
    Some(BlockId {
        section,
        node: nodes.len() - 1,
    })
}
