//! Tracing subscriber initialisation

use shopwire_domain::{LogConfig, Result, ShopwireError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter from `RUST_LOG`, falling back to the configured level.
///
/// # Errors
/// Returns `ShopwireError::Config` when the configured level is not a valid
/// filter directive.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ShopwireError::Config(format!("Invalid log level '{}': {e}", config.level))
        }),
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns `ShopwireError::Config` for an invalid filter, or when a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = Registry::default().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true).with_target(false)).try_init()
    } else {
        registry.with(fmt::layer().compact().with_target(false)).try_init()
    };

    installed
        .map_err(|e| ShopwireError::Config(format!("Failed to install tracing subscriber: {e}")))
}
