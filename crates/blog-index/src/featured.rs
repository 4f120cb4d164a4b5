//! Featured articles
//!
//! A featured articles block lists article links; each one becomes a
//! `featured-article` card, in authored order.

use crate::card::{build_article_card, ArticleCard};
use crate::lookup::ArticleLookup;
use blog_taxonomy::TaxonomyStore;

/// Card type of featured articles
pub const FEATURED_CARD_TYPE: &str = "featured-article";

/// Site path of an authored link, dropping origin, query and fragment
#[must_use]
pub fn link_path(href: &str) -> String {
    let path = match href.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |idx| &rest[idx..]),
        None => href,
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].to_string()
}

/// Cards for the featured article links, skipping articles that do not exist
///
/// Missing articles are logged with `origin` for context.
pub async fn featured_cards(
    lookup: &ArticleLookup,
    hrefs: &[String],
    store: Option<&TaxonomyStore>,
    date_locale: &str,
    origin: &str,
) -> Vec<ArticleCard> {
    let mut cards = Vec::with_capacity(hrefs.len());
    for href in hrefs {
        let path = link_path(href);
        match lookup.get_blog_article(&path, store).await {
            Some(mut article) => cards.push(build_article_card(
                &mut article,
                FEATURED_CARD_TYPE,
                store,
                date_locale,
            )),
            None => tracing::warn!(
                "Featured article does not exist or is missing in index: {}{}",
                origin,
                path
            ),
        }
    }
    cards
}
