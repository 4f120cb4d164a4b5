//! Blog Runtime
//!
//! Runs a page through its load phases on top of the decorators:
//! - [`PageLoader`]: eager, lazy and delayed phases in order
//! - [`BlockRuntime`] / [`ScriptInjector`]: where blocks load and scripts run
//! - [`ArticleHistory`]: recently read articles per locale
//! - [`RuntimeConfig`] and [`init_logging`] for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use blog_runtime::prelude::*;
//!
//! let config = RuntimeConfig::load("blog.toml")?;
//! let loader = PageLoader::from_config(config)?;
//! let load = loader.load(&mut page).await?;
//! assert_eq!(load.report.phases.last(), Some(&LoadPhase::Done));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod delayed;
pub mod error;
pub mod history;
pub mod hooks;
pub mod logging;
pub mod orchestrator;
pub mod phase;

pub use config::{AnalyticsConfig, AnalyticsScripts, LogFormat, LoggingConfig, RuntimeConfig};
pub use delayed::{host_of, run_delayed, schedule_delayed, EnvType};
pub use error::{ConfigError, RuntimeError, RuntimeResult};
pub use history::{
    ArticleHistory, FileHistoryStore, HistoryEntry, HistoryStore, MemoryHistoryStore,
};
pub use hooks::{
    BlockContext, BlockRuntime, RecordingInjector, ScriptInjector, SiteBlockRuntime,
    FEED_CARD_TYPE,
};
pub use logging::init_logging;
pub use orchestrator::{LoadReport, PageLoad, PageLoader, APPEAR_CLASS};
pub use phase::{allowed_transitions, validate_transition, LoadPhase, PhaseTracker};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading pages
    pub use crate::{
        BlockContext, BlockRuntime, LoadPhase, PageLoader, RuntimeConfig, RuntimeError,
        RuntimeResult, ScriptInjector,
    };
}
