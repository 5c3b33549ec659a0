//! Tests for the HTTP client module

use super::*;
use crate::auth::{MemoryTokenStore, Navigator, RecordingNavigator, TokenStore, TokenSupplier};
use crate::error::{Error, ResponseData, Result};
use pretty_assertions::assert_eq;
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> HttpClientConfig {
    HttpClientConfig::builder().base_url(server.uri()).build()
}

fn authed_client(
    server: &MockServer,
    store: &Arc<MemoryTokenStore>,
    navigator: &Arc<RecordingNavigator>,
) -> HttpClient {
    let navigator: Arc<dyn Navigator> = navigator.clone();
    HttpClient::with_bearer_auth(test_config(server), store.clone(), Some(navigator)).unwrap()
}

/// Authorization header of the last request the server saw
async fn last_authorization(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().expect("no request received");
    last.headers
        .get("authorization")
        .map(|v| v.to_str().unwrap().to_string())
}

/// Interceptor recording which hooks ran
#[derive(Default)]
struct HookLog {
    calls: Mutex<Vec<&'static str>>,
}

impl HookLog {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl Interceptor for HookLog {
    fn on_request(&self, _request: &mut OutgoingRequest) -> Result<()> {
        self.calls.lock().unwrap().push("request");
        Ok(())
    }

    fn on_request_error(&self, _err: &Error) {
        self.calls.lock().unwrap().push("request_error");
    }

    fn on_response(&self, response: Response) -> Result<Response> {
        self.calls.lock().unwrap().push("response");
        Ok(response)
    }

    fn on_response_error(&self, _err: &Error) {
        self.calls.lock().unwrap().push("response_error");
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert_eq!(config.login_path, "/auth/login");
    assert_eq!(
        config.default_headers.get("content-type"),
        Some(&"application/json".to_string())
    );
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .login_path("/signin")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(
        config.default_headers.get("x-custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.login_path, "/signin");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", "1")
        .query("limit", "10")
        .header("X-Request-Id", "abc123")
        .json(serde_json::json!({"key": "value"}))
        .timeout(Duration::from_secs(10));

    assert_eq!(
        config.query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(config.body.is_some());
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[test]
fn test_content_type_override_replaces_default() {
    let config = HttpClientConfig::builder()
        .header("Content-Type", "text/plain")
        .build();

    assert_eq!(config.default_headers.len(), 1);
    assert_eq!(
        config.default_headers.get("content-type"),
        Some(&"text/plain".to_string())
    );

    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(
        client.default_header("content-type").as_deref(),
        Some("text/plain")
    );
}

#[test]
fn test_invalid_default_header_rejected() {
    let config = HttpClientConfig::builder()
        .header("X-Bad", "line\nbreak")
        .build();

    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidHeader { .. }));
}

#[test]
fn test_bearer_client_registers_one_interceptor() {
    let store: Arc<dyn TokenSupplier> = Arc::new(MemoryTokenStore::new());
    let client = HttpClient::with_bearer_auth(HttpClientConfig::default(), store, None).unwrap();
    assert_eq!(client.interceptor_count(), 1);
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_http_client_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": 42
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(&mock_server)).unwrap();
    let data: serde_json::Value = client.get_json("/api/data").await.unwrap();

    assert_eq!(data["value"], 42);
}

#[tokio::test]
async fn test_http_client_post_sends_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"name": "test"})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(&mock_server)).unwrap();
    let response = client
        .post("/api/items", serde_json::json!({"name": "test"}))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_http_client_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "test"))
        .and(header("X-Request-Id", "req-456"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(&mock_server)).unwrap();
    let response = client
        .get_with_config(
            "/api/search",
            RequestConfig::new()
                .query("q", "test")
                .header("X-Request-Id", "req-456"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_non_success_status_is_typed_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(&mock_server)).unwrap();
    let err = client.get("/api/missing").await.unwrap_err();

    assert_eq!(err.message(), "Request failed with status code 404");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.status_text(), Some("Not Found"));
    assert_eq!(
        err.response_data(),
        Some(&ResponseData::Text("Not found".to_string()))
    );
    assert!(err.failure().unwrap().url.ends_with("/api/missing"));
}

#[tokio::test]
async fn test_relative_url_without_base_fails() {
    let hooks = Arc::new(HookLog::default());
    let client = HttpClient::new().unwrap().with_interceptor(hooks.clone());

    let err = client.get("/api/data").await.unwrap_err();

    assert!(matches!(err, Error::InvalidUrl(_)));
    assert_eq!(hooks.calls(), vec!["request_error"]);
}

// ============================================================================
// Interceptor pipeline
// ============================================================================

#[tokio::test]
async fn test_hooks_on_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let hooks = Arc::new(HookLog::default());
    let client = HttpClient::with_config(test_config(&mock_server))
        .unwrap()
        .with_interceptor(hooks.clone());

    client.get("/ok").await.unwrap();

    assert_eq!(hooks.calls(), vec!["request", "response"]);
}

#[tokio::test]
async fn test_hooks_on_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let hooks = Arc::new(HookLog::default());
    let client = HttpClient::with_config(test_config(&mock_server))
        .unwrap()
        .with_interceptor(hooks.clone());

    client.get("/fail").await.unwrap_err();

    assert_eq!(hooks.calls(), vec!["request", "response_error"]);
}

#[tokio::test]
async fn test_request_hook_failure_skips_send() {
    struct Reject;
    impl Interceptor for Reject {
        fn on_request(&self, _request: &mut OutgoingRequest) -> Result<()> {
            Err(Error::Other("rejected".into()))
        }
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hooks = Arc::new(HookLog::default());
    let client = HttpClient::with_config(test_config(&mock_server))
        .unwrap()
        .with_interceptor(Arc::new(Reject))
        .with_interceptor(hooks.clone());

    let err = client.get("/never").await.unwrap_err();

    assert_eq!(err.to_string(), "rejected");
    assert_eq!(hooks.calls(), vec!["request_error"]);
}

// ============================================================================
// Bearer token
// ============================================================================

#[tokio::test]
async fn test_token_attached_when_present() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc123"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    client.get("/me").await.unwrap();
}

#[tokio::test]
async fn test_token_read_fresh_each_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("first"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    client.get("/me").await.unwrap();
    assert_eq!(
        last_authorization(&mock_server).await.as_deref(),
        Some("Bearer first")
    );

    store.set_token("second").unwrap();
    client.get("/me").await.unwrap();
    assert_eq!(
        last_authorization(&mock_server).await.as_deref(),
        Some("Bearer second")
    );
}

#[tokio::test]
async fn test_no_token_sends_no_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    client.get("/public").await.unwrap();

    assert!(last_authorization(&mock_server).await.is_none());
}

#[tokio::test]
async fn test_stale_default_header_not_sent_after_logout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);
    client.update_bearer_token();

    store.clear_token();
    client.get("/public").await.unwrap();

    assert!(last_authorization(&mock_server).await.is_none());
}

#[tokio::test]
async fn test_token_overrides_request_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("current"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    client
        .get_with_config(
            "/me",
            RequestConfig::new().header("Authorization", "Bearer manual"),
        )
        .await
        .unwrap();

    assert_eq!(
        last_authorization(&mock_server).await.as_deref(),
        Some("Bearer current")
    );
}

#[tokio::test]
async fn test_forbidden_logs_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    let err = client.get("/admin").await.unwrap_err();

    assert_eq!(err.message(), "Request failed with status code 403");
    assert!(store.get_token().is_none());
    assert_eq!(navigator.visited(), vec!["/auth/login".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_logs_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Token expired"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    let err = client.get("/me").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(store.get_token().is_none());
    assert_eq!(navigator.last().as_deref(), Some("/auth/login"));
}

#[tokio::test]
async fn test_invalid_token_body_logs_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid Token"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    client.get("/me").await.unwrap_err();

    assert!(store.get_token().is_none());
    assert_eq!(navigator.visited().len(), 1);
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = authed_client(&mock_server, &store, &navigator);

    let err = client.get("/me").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(store.get_token().as_deref(), Some("abc"));
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_custom_login_path_used_for_redirect() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let navigator = Arc::new(RecordingNavigator::new());
    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .login_path("/signin")
        .build();
    let nav: Arc<dyn Navigator> = navigator.clone();
    let client = HttpClient::with_bearer_auth(config, store, Some(nav)).unwrap();

    client.get("/me").await.unwrap_err();

    assert_eq!(navigator.visited(), vec!["/signin".to_string()]);
}

#[tokio::test]
async fn test_auth_failure_counter() {
    struct CountingSupplier(AtomicUsize);
    impl TokenSupplier for CountingSupplier {
        fn get_token(&self) -> Option<String> {
            Some("abc".to_string())
        }
        fn clear_token(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let supplier = Arc::new(CountingSupplier(AtomicUsize::new(0)));
    let client =
        HttpClient::with_bearer_auth(test_config(&mock_server), supplier.clone(), None).unwrap();

    client.get("/admin").await.unwrap_err();

    assert_eq!(supplier.0.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Default Authorization header
// ============================================================================

#[test]
fn test_update_bearer_token_sets_and_removes_default() {
    let store = Arc::new(MemoryTokenStore::new());
    let client =
        HttpClient::with_bearer_auth(HttpClientConfig::default(), store.clone(), None).unwrap();

    store.set_token("abc").unwrap();
    client.update_bearer_token();
    assert_eq!(
        client.default_header("Authorization").as_deref(),
        Some("Bearer abc")
    );

    // Idempotent
    client.update_bearer_token();
    assert_eq!(
        client.default_header("Authorization").as_deref(),
        Some("Bearer abc")
    );

    store.clear_token();
    client.update_bearer_token();
    assert!(client.default_header("Authorization").is_none());

    client.update_bearer_token();
    assert!(client.default_header("Authorization").is_none());
}

#[test]
fn test_update_bearer_token_shared_by_clones() {
    let store = Arc::new(MemoryTokenStore::with_token("shared"));
    let client =
        HttpClient::with_bearer_auth(HttpClientConfig::default(), store, None).unwrap();
    let clone = client.clone();

    client.update_bearer_token();

    assert_eq!(
        clone.default_header("Authorization").as_deref(),
        Some("Bearer shared")
    );
}

#[test]
fn test_update_bearer_token_without_supplier_removes_header() {
    let client = HttpClient::new().unwrap();
    client
        .set_default_header("Authorization", "Bearer leftover")
        .unwrap();

    client.update_bearer_token();

    assert!(client.default_header("Authorization").is_none());
}

#[test]
fn test_update_bearer_token_unencodable_token() {
    let store = Arc::new(MemoryTokenStore::with_token("bad\ntoken"));
    let client =
        HttpClient::with_bearer_auth(HttpClientConfig::default(), store, None).unwrap();
    client
        .set_default_header(AUTHORIZATION.as_str(), "Bearer old")
        .unwrap();

    client.update_bearer_token();

    assert!(client.default_header("Authorization").is_none());
}

#[test]
fn test_default_content_type() {
    let client = HttpClient::new().unwrap();
    assert_eq!(
        client.default_header("Content-Type").as_deref(),
        Some("application/json")
    );

    client.remove_default_header("Content-Type");
    assert!(client.default_header("Content-Type").is_none());
}

#[tokio::test]
async fn test_default_token_sent_without_interceptor() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer pushed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(&mock_server)).unwrap();
    client
        .set_default_header("Authorization", "Bearer pushed")
        .unwrap();

    client.get("/me").await.unwrap();
}
