//! API endpoint configuration
//!
//! The backend is deployed in several environments. Each [`Deployment`] maps
//! to a fixed base URL; an explicit `base_url` replaces it entirely.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Cloud Run deployment of the backend API
pub const CLOUD_RUN_API_BASE_URL: &str = "https://athena-443460999135.asia-southeast1.run.app";

/// Backend running on the developer's machine
pub const LOCAL_API_BASE_URL: &str = "http://localhost:8000";

/// Platform-hosted deployment of the backend API
pub const HOSTED_API_BASE_URL: &str = "https://athena-api.onrender.com";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ATHENA";

/// Known backend deployments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Deployment {
    #[default]
    CloudRun,
    Local,
    Hosted,
}

impl Deployment {
    /// Base URL of the backend for this deployment
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::CloudRun => CLOUD_RUN_API_BASE_URL,
            Self::Local => LOCAL_API_BASE_URL,
            Self::Hosted => HOSTED_API_BASE_URL,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CloudRun => "cloud-run",
            Self::Local => "local",
            Self::Hosted => "hosted",
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Deployment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud-run" | "cloudrun" => Ok(Self::CloudRun),
            "local" => Ok(Self::Local),
            "hosted" => Ok(Self::Hosted),
            other => Err(CoreError::UnknownDeployment(other.to_string())),
        }
    }
}

impl TryFrom<String> for Deployment {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Loader-side shape; `deployment` goes through [`Deployment::from_str`] so
/// unknown names surface as [`CoreError::UnknownDeployment`]
#[derive(Deserialize)]
struct RawApiConfig {
    deployment: String,
    #[serde(default)]
    base_url: Option<String>,
}

/// Backend API configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Which deployment to talk to
    #[serde(default)]
    pub deployment: Deployment,

    /// Explicit base URL, overrides the deployment's URL
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ApiConfig {
    /// Configuration pointing at a known deployment
    pub fn for_deployment(deployment: Deployment) -> Self {
        Self {
            deployment,
            base_url: None,
        }
    }

    /// Resolved base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.deployment.base_url())
            .trim_end_matches('/')
    }

    /// Load configuration with defaults and `ATHENA_` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed or the
    /// resulting base URL is invalid
    pub fn from_env() -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Self::finish(settings.try_deserialize()?)
    }

    /// Load configuration from a file, with environment overrides on top
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// resulting base URL is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Self::finish(settings.try_deserialize()?)
    }

    fn defaults() -> CoreResult<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("deployment", Deployment::default().as_str())?)
    }

    fn finish(raw: RawApiConfig) -> CoreResult<Self> {
        let config = Self {
            deployment: raw.deployment.parse()?,
            base_url: raw.base_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the resolved base URL is an absolute http(s) URL
    pub fn validate(&self) -> CoreResult<()> {
        let base_url = self.base_url();
        let parsed = url::Url::parse(base_url)
            .map_err(|e| CoreError::invalid_config(format!("base_url '{base_url}': {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CoreError::invalid_config(format!(
                "base_url '{base_url}' has unsupported scheme '{scheme}'"
            ))),
        }
    }
}
