//! Delayed phase
//!
//! Runs well after the page is usable: records the core web vitals sampling
//! checkpoint and loads the analytics launch script of the environment.

use crate::config::AnalyticsConfig;
use crate::hooks::ScriptInjector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Deployment environment of a host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvType {
    /// Local or unknown host
    #[default]
    Dev,
    /// Preview deployment
    Preview,
    /// Published site
    Live,
}

/// Hostname of an origin: no scheme, port, path or credentials
#[must_use]
pub fn host_of(origin: &str) -> &str {
    let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    host.split(':').next().unwrap_or_default()
}

/// Run the delayed work for a page served from `origin`
///
/// A launch script that fails to load is logged; nothing else depends on it.
pub async fn run_delayed(
    injector: &dyn ScriptInjector,
    analytics: &AnalyticsConfig,
    origin: &str,
) -> EnvType {
    injector.sample_rum("cwv");
    let env = analytics.env_type(host_of(origin));
    let script = analytics.scripts.for_env(env);
    if let Err(e) = injector.inject_script(script).await {
        tracing::warn!("Analytics launch script failed: {}", e);
    }
    env
}

/// Schedule the delayed work after `delay`
///
/// The returned handle is only needed by callers that want to observe the
/// work; dropping it does not cancel it.
pub fn schedule_delayed(
    delay: Duration,
    injector: Arc<dyn ScriptInjector>,
    analytics: AnalyticsConfig,
    origin: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let env = run_delayed(injector.as_ref(), &analytics, &origin).await;
        tracing::debug!(?env, "delayed phase ran");
    })
}
