//! HTTP client with an interceptor pipeline
//!
//! Provides an HTTP client that handles:
//! - Default headers shared by every clone of the client
//! - Request and response interceptors
//! - Typed failures for non-success responses
//! - Bearer token attachment and logout on auth failures

use super::interceptor::{Interceptor, OutgoingRequest};
use crate::auth::{apply_token, BearerAuth, Navigator, TokenSupplier, DEFAULT_LOGIN_PATH};
use crate::error::{Error, HttpFailure, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative request paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests, keyed by lowercase name
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Path of the login page to redirect to when the session ends
    pub login_path: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            CONTENT_TYPE.as_str().to_string(),
            "application/json".to_string(),
        );

        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers,
            user_agent: format!("bearer-client/{}", env!("CARGO_PKG_VERSION")),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    ///
    /// Names are case-insensitive: `Content-Type` replaces the built-in
    /// `content-type` default.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the login page path
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.config.login_path = path.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client with interceptors
///
/// Clones share the default header map, so a token pushed with
/// [`update_bearer_token`](Self::update_bearer_token) is seen by all of them.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    default_headers: Arc<RwLock<HeaderMap>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    token_supplier: Option<Arc<dyn TokenSupplier>>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let default_headers = header_map(&config.default_headers)?;

        Ok(Self {
            client,
            config,
            default_headers: Arc::new(RwLock::new(default_headers)),
            interceptors: Vec::new(),
            token_supplier: None,
        })
    }

    /// Create a client that attaches bearer tokens from `supplier`
    ///
    /// Auth failures clear the token and, when a navigator is given, redirect
    /// to the configured login path.
    pub fn with_bearer_auth(
        config: HttpClientConfig,
        supplier: Arc<dyn TokenSupplier>,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Result<Self> {
        let mut auth = BearerAuth::new(Arc::clone(&supplier)).login_path(&config.login_path);
        if let Some(navigator) = navigator {
            auth = auth.with_navigator(navigator);
        }

        let mut client = Self::with_config(config)?;
        client.token_supplier = Some(supplier);
        client.add_interceptor(Arc::new(auth));
        Ok(client)
    }

    /// Register an interceptor after the existing ones
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Builder-style [`add_interceptor`](Self::add_interceptor)
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.add_interceptor(interceptor);
        self
    }

    /// Number of registered interceptors
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Current value of a default header
    pub fn default_header(&self, name: &str) -> Option<String> {
        self.read_defaults()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }

    /// Set a default header for all future requests
    pub fn set_default_header(&self, name: &str, value: &str) -> Result<()> {
        let name = header_name(name)?;
        let value = header_value(name.as_str(), value)?;
        self.write_defaults().insert(name, value);
        Ok(())
    }

    /// Remove a default header
    pub fn remove_default_header(&self, name: &str) {
        self.write_defaults().remove(name);
    }

    /// Resync the default `Authorization` header with the token supplier
    ///
    /// Call after a login or logout that happened outside the request cycle.
    /// With a token the header becomes `Bearer <token>`; without one (or with
    /// no supplier configured) it is removed.
    pub fn update_bearer_token(&self) {
        let mut defaults = self.write_defaults();
        let Some(supplier) = &self.token_supplier else {
            defaults.remove(AUTHORIZATION);
            return;
        };

        match apply_token(&mut defaults, supplier.as_ref()) {
            Ok(true) => debug!("Default bearer token updated"),
            Ok(false) => debug!("Default bearer token removed"),
            Err(e) => {
                warn!(error = %e, "Token cannot be sent as a header, removing default");
                defaults.remove(AUTHORIZATION);
            }
        }
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, config).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a POST request with config
    pub async fn post_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::POST, url, config).await
    }

    /// Make a PUT request
    pub async fn put(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await
    }

    /// Make a generic request through the interceptor pipeline
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let mut outgoing = match self.prepare(method, url, config) {
            Ok(outgoing) => outgoing,
            Err(e) => return Err(self.reject_request(e)),
        };

        for interceptor in &self.interceptors {
            if let Err(e) = interceptor.on_request(&mut outgoing) {
                return Err(self.reject_request(e));
            }
        }

        let mut response = match self.send(outgoing).await {
            Ok(response) => response,
            Err(e) => return Err(self.reject_response(e)),
        };

        for interceptor in &self.interceptors {
            response = match interceptor.on_response(response) {
                Ok(response) => response,
                Err(e) => return Err(self.reject_response(e)),
            };
        }

        Ok(response)
    }

    /// Make a request and parse JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Build the outgoing request description
    fn prepare(&self, method: Method, url: &str, config: RequestConfig) -> Result<OutgoingRequest> {
        let url = self.build_url(url)?;

        let mut headers = self.read_defaults().clone();
        for (key, value) in &config.headers {
            let name = header_name(key)?;
            let value = header_value(name.as_str(), value)?;
            headers.insert(name, value);
        }

        Ok(OutgoingRequest {
            method,
            url,
            headers,
            query: config.query,
            body: config.body,
            timeout: config.timeout.unwrap_or(self.config.timeout),
        })
    }

    /// Send a prepared request, turning non-success statuses into errors
    async fn send(&self, outgoing: OutgoingRequest) -> Result<Response> {
        let OutgoingRequest {
            method,
            url,
            headers,
            query,
            body,
            timeout,
        } = outgoing;

        let mut req = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .timeout(timeout);

        if !query.is_empty() {
            req = req.query(&query);
        }

        if let Some(ref body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.bytes().await?;
            return Err(Error::Response(HttpFailure::new(method, url, status, &body)));
        }

        debug!("Request succeeded: {} {}", method, response.url());
        Ok(response)
    }

    fn reject_request(&self, err: Error) -> Error {
        for interceptor in &self.interceptors {
            interceptor.on_request_error(&err);
        }
        err
    }

    fn reject_response(&self, err: Error) -> Error {
        for interceptor in &self.interceptors {
            interceptor.on_response_error(&err);
        }
        err
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                Ok(Url::parse(&format!("{base}/{path}"))?)
            }
            None => Ok(Url::parse(path)?),
        }
    }

    fn read_defaults(&self) -> std::sync::RwLockReadGuard<'_, HeaderMap> {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_defaults(&self) -> std::sync::RwLockWriteGuard<'_, HeaderMap> {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .field("has_token_supplier", &self.token_supplier.is_some())
            .finish_non_exhaustive()
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::invalid_header(name, e.to_string()))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::invalid_header(name, e.to_string()))
}

/// Convert a string map into a header map
fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = header_name(key)?;
        let value = header_value(name.as_str(), value)?;
        map.insert(name, value);
    }
    Ok(map)
}
