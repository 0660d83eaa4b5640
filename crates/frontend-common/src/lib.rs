//! Frontend credential storage and authenticated requests for Athena

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use auth::CredentialStore;
pub use client::{ApiClient, ApiClientBuilder, RequestOptions};
pub use config::AuthConfig;
pub use error::ClientError;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
