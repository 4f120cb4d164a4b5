//! Logging setup for the binary

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{RuntimeError, RuntimeResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. Output goes to
/// stderr so command output on stdout stays machine readable.
///
/// # Errors
/// Returns `RuntimeError::Logging` if a global subscriber is already set
pub fn init_logging(config: &LoggingConfig) -> RuntimeResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| RuntimeError::Logging(e.to_string()))
}
