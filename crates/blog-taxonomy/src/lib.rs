//! Blog Taxonomy
//!
//! Topic metadata for the blog and everything derived from it:
//!
//! - [`TaxonomyStore`]: topics of one language, exact-match lookup, parents on demand
//! - [`TaxonomyHandle`]: write-once page taxonomy, `NotLoaded | Loaded | Unavailable`
//! - [`compute_taxonomy`]: category / topics / visible topics / all topics of an article
//! - [`TopicLink`]: topic links, resolved or deferred until the store loads
//!
//! # Architecture
//!
//! ```text
//! _taxonomy.json → TaxonomySheet → TaxonomyStore → TaxonomyHandle (write once)
//!                                                        ↓
//!                  raw tags → parse_tags → compute_taxonomy → ArticleTaxonomy
//!                                                        ↓
//!                                   link_for_topic → Resolved | Deferred
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod article;
pub mod error;
pub mod link;
pub mod loader;
pub mod resolver;
pub mod sheet;
pub mod store;
pub mod topic;

pub use article::{clean_path, Article};
pub use error::{TaxonomyError, TaxonomyResult};
pub use link::{display_title, link_for_topic, resolve_href, TopicLink, TOPIC_LINK_ATTR, UNRESOLVED_HREF};
pub use loader::{TaxonomyHandle, TaxonomyLoader, TaxonomyState};
pub use resolver::{compute_taxonomy, meta_excluded_tags, parse_tags, ArticleTaxonomy, DEFAULT_CATEGORY};
pub use sheet::{TaxonomyRow, TaxonomySheet};
pub use store::TaxonomyStore;
pub use topic::Topic;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the taxonomy
    pub use crate::{
        compute_taxonomy, link_for_topic, parse_tags, Article, ArticleTaxonomy, TaxonomyHandle,
        TaxonomyLoader, TaxonomyState, TaxonomyStore, Topic, TopicLink,
    };
}
