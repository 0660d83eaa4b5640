//! Initialization functions for tracing

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::tracing::config::InstrumentationConfig;
use crate::{CoreError, CoreResult};

/// Initialize tracing with the given configuration
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(config: &InstrumentationConfig) -> CoreResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| CoreError::internal_error(format!("failed to install subscriber: {e}")))?;

    tracing::debug!(
        service = %config.service_name,
        version = %config.service_version,
        "tracing initialized"
    );
    Ok(())
}

/// Initialize with default configuration from environment
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_default() -> CoreResult<()> {
    init_tracing(&InstrumentationConfig::from_env())
}
