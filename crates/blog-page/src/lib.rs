//! Blog Page
//!
//! The page as the decoration runtime sees it, and the decorators that run on
//! it:
//! - [`document`]: head metadata, sections, default content and blocks
//! - [`decorate_main`]: auto blocks, section split, section/block decoration
//! - [`fixup_topic_links`]: resolves topic links emitted before the taxonomy loaded
//! - [`sync_article_tags`]: aligns `article:tag` metadata with the taxonomy
//! - [`build_tags_block`]: the tags block of article pages
//! - [`build_highlight_section`]: new post alerts on `fact-box` pages
//!
//! # Example
//!
//! ```rust,ignore
//! use blog_page::prelude::*;
//!
//! let mut page = Page::from_json(&json)?;
//! let report = decorate_main(&mut page, None);
//!
//! // later, once the taxonomy has settled
//! fixup_topic_links(&mut page, handle.store());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod auto_blocks;
pub mod decorate;
pub mod document;
pub mod error;
pub mod fixup;
pub mod highlight;
pub mod metadata;
pub mod sections;
pub mod tags_block;

pub use auto_blocks::{build_auto_blocks, AutoBlockReport};
pub use decorate::decorate_main;
pub use document::{
    Anchor, Block, BlockId, Cell, Head, HeadLink, Inline, LoadStatus, Main, MetaTag, Node, Page,
    Picture, Section,
};
pub use error::{PageError, PageResult};
pub use fixup::fixup_topic_links;
pub use highlight::{build_highlight_section, FACT_BOX_CLASS};
pub use metadata::{sync_article_tags, MetaSync, ARTICLE_TAG};
pub use sections::{decorate_block, decorate_blocks, decorate_sections, split_sections};
pub use tags_block::build_tags_block;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for decorating pages
    pub use crate::{
        build_tags_block, decorate_main, fixup_topic_links, sync_article_tags, Block, BlockId,
        LoadStatus, Main, Node, Page, Section,
    };
}
