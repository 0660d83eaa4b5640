//! Authenticated HTTP requests
//!
//! [`ApiClient::authenticated_fetch`] sends a request exactly as described by
//! [`RequestOptions`], except that a stored token is attached as
//! `Authorization: Bearer <token>`, replacing any `Authorization` header the
//! caller supplied. The response, including non-2xx statuses, and any
//! transport error are returned untouched.

use crate::auth::CredentialStore;
use crate::error::ClientError;
use athena_core::ApiConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, IntoUrl, Method, Response};
use serde::Serialize;

const USER_AGENT: &str = concat!("athena-frontend/", env!("CARGO_PKG_VERSION"));

/// Method, headers and body of an outgoing request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    /// A `GET` with no headers and no body
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header, keeping existing values for the same name
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace all headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set a raw body
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body and `Content-Type: application/json`
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `value` cannot be encoded
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }
}

/// HTTP client that attaches the stored bearer token
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig, credentials: CredentialStore) -> Result<Self, ClientError> {
        Self::builder()
            .base_url(config.base_url())
            .credentials(credentials)
            .build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store consulted on every request
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Join `path` onto the base URL
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send `options` to `target`, adding the stored token if there is one
    ///
    /// An empty stored token is not attached. A token that is not a valid
    /// header value makes the request fail with a builder error.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error for an invalid target or a transport
    /// failure. HTTP error statuses are not errors.
    pub async fn authenticated_fetch(
        &self,
        target: impl IntoUrl,
        options: RequestOptions,
    ) -> Result<Response, reqwest::Error> {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        let token = self.credentials.get_token().filter(|token| !token.is_empty());
        if token.is_some() {
            headers.remove(AUTHORIZATION);
        }

        let mut request = self.client.request(method, target).headers(headers);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let request = request.build()?;
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            authenticated = token.is_some(),
            "sending request"
        );
        self.client.execute(request).await
    }

    /// Send `options` to a path under the base URL
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::authenticated_fetch`]
    pub async fn fetch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, reqwest::Error> {
        self.authenticated_fetch(self.url(path), options).await
    }

    /// `GET` a path under the base URL
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::authenticated_fetch`]
    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.fetch(path, RequestOptions::new()).await
    }

    /// `POST` a JSON body to a path under the base URL
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized or the request fails
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        let options = RequestOptions::new().method(Method::POST).json(body)?;
        Ok(self.fetch(path, options).await?)
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    credentials: Option<CredentialStore>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credential store; without one, requests are sent unauthenticated
    pub fn credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let client_builder =
            ClientBuilder::new().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        Ok(ApiClient {
            client: client_builder.build()?,
            base_url,
            credentials: self.credentials.unwrap_or_default(),
        })
    }
}
