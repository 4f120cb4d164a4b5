//! Blog Core
//!
//! Shared foundations for the blog decoration runtime:
//! - Site languages, locales and language-scoped paths
//! - Class-name and HTML text helpers
//! - The [`ResourceFetcher`] seam used for every content fetch
//!
//! # Example
//!
//! ```rust,ignore
//! use blog_core::{DirFetcher, Language, ResourceFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let language = Language::from_path("/de/topics/cloud");
//! let fetcher = DirFetcher::new("./content");
//!
//! let taxonomy = fetcher
//!     .fetch_text(&format!("{}/topics/_taxonomy.json", language.root_path()))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod fetch;
pub mod language;
pub mod text;

pub use error::{FetchError, FetchResult};
pub use fetch::{DirFetcher, HttpFetcher, ResourceFetcher};
pub use language::{Language, page_name};
pub use text::{escape_html, to_class_name};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with blog resources
    pub use crate::error::{FetchError, FetchResult};
    pub use crate::fetch::{DirFetcher, HttpFetcher, ResourceFetcher};
    pub use crate::language::Language;
    pub use crate::text::to_class_name;
}
