//! Integration tests for authenticated requests

#![cfg(not(target_arch = "wasm32"))]

use athena_core::MemoryStore;
use athena_frontend_common::{ApiClient, AuthConfig, ClientError, CredentialStore, RequestOptions};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with_token(server: &MockServer, token: Option<&str>) -> (ApiClient, CredentialStore) {
    let credentials = CredentialStore::new(MemoryStore::new());
    if let Some(token) = token {
        credentials.set_token(token);
    }
    let client = ApiClient::builder()
        .base_url(server.uri())
        .credentials(credentials.clone())
        .build()
        .unwrap();
    (client, credentials)
}

async fn only_request(server: &MockServer) -> wiremock::Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

#[tokio::test]
async fn test_token_added_alongside_caller_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("x-foo", "1"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, Some("abc123"));
    let options = RequestOptions::new().header(
        HeaderName::from_static("x-foo"),
        HeaderValue::from_static("1"),
    );

    let response = client
        .authenticated_fetch(format!("{}/api/profile", mock_server.uri()), options)
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_no_token_no_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, None);
    client
        .authenticated_fetch(
            format!("{}/api/public", mock_server.uri()),
            RequestOptions::new(),
        )
        .await
        .unwrap();

    let request = only_request(&mock_server).await;
    assert!(request.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_no_token_keeps_caller_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, None);
    let options = RequestOptions::new()
        .header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    client.fetch("/api/basic", options).await.unwrap();

    let request = only_request(&mock_server).await;
    assert_eq!(request.headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
}

#[tokio::test]
async fn test_stored_token_overrides_caller_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, Some("NEW"));
    let options =
        RequestOptions::new().header(AUTHORIZATION, HeaderValue::from_static("Bearer OLD"));
    client.fetch("/api/items", options).await.unwrap();

    let request = only_request(&mock_server).await;
    let values: Vec<_> = request.headers.get_all(AUTHORIZATION).iter().collect();
    assert_eq!(values, vec!["Bearer NEW"]);
}

#[tokio::test]
async fn test_empty_token_not_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, credentials) = client_with_token(&mock_server, Some(""));
    assert!(credentials.is_authenticated());
    client.get("/api/items").await.unwrap();

    let request = only_request(&mock_server).await;
    assert!(request.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_token_read_at_request_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, credentials) = client_with_token(&mock_server, None);
    credentials.set_token("late");
    client.get("/api/first").await.unwrap();
    credentials.remove_token();
    client.get("/api/second").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].headers[AUTHORIZATION], "Bearer late");
    assert!(requests[1].headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_method_and_body_pass_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, Some("abc"));
    let options = RequestOptions::new()
        .method(Method::PUT)
        .header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("text/plain"),
        )
        .body("dark-mode=on");

    let response = client.fetch("/api/settings", options).await.unwrap();
    assert_eq!(response.status(), 204);

    let request = only_request(&mock_server).await;
    assert_eq!(request.body, b"dark-mode=on");
}

#[tokio::test]
async fn test_post_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(header("authorization", "Bearer abc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_token(&mock_server, Some("abc"));
    let response = client
        .post_json("/api/notes", &json!({"title": "hello"}))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 42);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let (client, credentials) = client_with_token(&mock_server, Some("revoked"));
    let response = client.get("/api/me").await.unwrap();

    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.unwrap(), "Unauthorized");
    // A rejected token stays stored; logout is the caller's decision
    assert!(credentials.is_authenticated());
}

#[tokio::test]
async fn test_transport_error_propagates() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let credentials = CredentialStore::new(MemoryStore::new());
    credentials.set_token("abc");
    let client = ApiClient::builder()
        .base_url(format!("http://{addr}"))
        .credentials(credentials)
        .build()
        .unwrap();

    let error = client.get("/api/me").await.unwrap_err();
    assert!(error.is_connect() || error.is_request());
}

#[tokio::test]
async fn test_invalid_target_is_builder_error() {
    let client = ApiClient::builder()
        .base_url("http://localhost:8000")
        .build()
        .unwrap();

    let error = client
        .authenticated_fetch("not a url", RequestOptions::new())
        .await
        .unwrap_err();
    assert!(error.is_builder());
}

#[tokio::test]
async fn test_token_with_invalid_header_chars_fails_request() {
    let mock_server = MockServer::start().await;
    let (client, _) = client_with_token(&mock_server, Some("bad\ntoken"));

    let error = client.get("/api/me").await.unwrap_err();
    assert!(error.is_builder());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_credentials_send_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let credentials = CredentialStore::unavailable();
    credentials.set_token("ignored");
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .credentials(credentials)
        .build()
        .unwrap();
    client.get("/api/me").await.unwrap();

    let request = only_request(&mock_server).await;
    assert!(request.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_login_logout_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let medium = MemoryStore::new();
    let credentials = CredentialStore::new(medium.clone());
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .credentials(credentials.clone())
        .build()
        .unwrap();

    credentials.set_token("jwt");
    credentials
        .set_user(&json!({"id": "u1", "email": "a@example.com"}))
        .unwrap();
    assert!(medium.contains_key(AuthConfig::TOKEN_KEY));
    assert!(medium.contains_key(AuthConfig::USER_KEY));

    client.get("/api/me").await.unwrap();
    credentials.remove_token();
    client.get("/api/me").await.unwrap();

    assert!(medium.is_empty());
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers[AUTHORIZATION], "Bearer jwt");
    assert!(requests[1].headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_post_json_serialization_error() {
    use std::collections::HashMap;

    let client = ApiClient::builder()
        .base_url("http://localhost:8000")
        .build()
        .unwrap();

    // Non-string map keys cannot be encoded as JSON
    let mut body = HashMap::new();
    body.insert(vec![1u8], "value");

    let result = client.post_json("/api/notes", &body).await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}

#[tokio::test]
async fn test_builder_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let default_client = ApiClient::builder()
        .base_url(mock_server.uri())
        .build()
        .unwrap();
    let custom_client = ApiClient::builder()
        .base_url(mock_server.uri())
        .user_agent("athena-tests/1.0")
        .build()
        .unwrap();

    default_client.get("/api/me").await.unwrap();
    custom_client.get("/api/me").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let agent = requests[0].headers[reqwest::header::USER_AGENT]
        .to_str()
        .unwrap();
    assert!(agent.starts_with("athena-frontend/"));
    assert_eq!(requests[1].headers[reqwest::header::USER_AGENT], "athena-tests/1.0");
}
