//! Blog Index
//!
//! Article listings and lookups:
//! - [`ArticleIndex`]: paged query index of a language
//! - [`ArticleLookup`]: article by path from its page metadata, cached
//! - [`build_article_card`]: card model and HTML for an article
//! - [`Placeholders`]: localized texts, fetched once
//! - [`featured_cards`]: cards for a featured articles block

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod card;
pub mod date;
pub mod error;
pub mod featured;
pub mod index;
pub mod lookup;
pub mod meta;
pub mod placeholders;

pub use card::{build_article_card, ArticleCard};
pub use date::{format_card_date, format_date, parse_card_date};
pub use error::{IndexError, IndexResult};
pub use featured::{featured_cards, link_path, FEATURED_CARD_TYPE};
pub use index::{ArticleIndex, PAGE_SIZE};
pub use lookup::{article_from_meta, trim_title, ArticleCache, ArticleLookup, CacheStats};
pub use meta::{fetch_page_meta, parse_head_meta, PageMeta};
pub use placeholders::{PlaceholderMap, Placeholders};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for article listings
    pub use crate::{
        build_article_card, featured_cards, ArticleCard, ArticleIndex, ArticleLookup, Placeholders,
    };
}
