//! Configuration for tracing

use serde::{Deserialize, Serialize};

/// Instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to log output
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "debug", "athena_frontend_common=trace")
    pub log_level: String,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "athena".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `SERVICE_NAME`: Service name
    /// - `SERVICE_VERSION`: Service version
    /// - `RUST_LOG`: Log level filter
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: std::env::var("SERVICE_VERSION").unwrap_or(defaults.service_version),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Development configuration with debug logging
    pub fn dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_config() {
        let config = InstrumentationConfig::dev();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.service_name, "athena");
    }
}
