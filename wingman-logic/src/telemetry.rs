//! Tracing subscriber setup for binaries built on Wingman.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wingman_core::WingmanConfig;

/// `RUST_LOG` when set and valid, otherwise the configured filter.
pub fn env_filter(config: &WingmanConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber. Logs go to stderr, as JSON lines when
/// `log_json` is set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &WingmanConfig) -> Result<(), TryInitError> {
    let json = config.log_json;
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .try_init()?;

    tracing::debug!(filter = %config.log_filter, json, "tracing initialized");
    Ok(())
}
