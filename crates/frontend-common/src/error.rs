//! Client error types

use thiserror::Error;

/// Errors from building the API client or its convenience requests
///
/// [`ApiClient::authenticated_fetch`](crate::ApiClient::authenticated_fetch)
/// never wraps its failures in this type; it returns the transport error as is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
