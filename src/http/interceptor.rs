//! Request/response interceptors
//!
//! Every request made through [`HttpClient`](super::HttpClient) passes through
//! its interceptors in registration order:
//!
//! 1. `on_request` may rewrite the outgoing request description
//! 2. the request is sent
//! 3. `on_response` sees each successful response
//! 4. `on_request_error` / `on_response_error` observe failures
//!
//! Error hooks cannot recover a failure; the caller always gets the error.

use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Mutable description of a request about to be sent
///
/// Default headers of the client are already merged into `headers`.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Query parameters appended to the URL
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Timeout for this request
    pub timeout: Duration,
}

/// Hooks around every request
///
/// All hooks default to passing the request, response or error through.
pub trait Interceptor: Send + Sync {
    /// Called before the request is sent
    fn on_request(&self, _request: &mut OutgoingRequest) -> Result<()> {
        Ok(())
    }

    /// Called when the request could not be prepared
    fn on_request_error(&self, _err: &Error) {}

    /// Called with each successful response
    fn on_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }

    /// Called when sending failed or the response status was not a success
    fn on_response_error(&self, _err: &Error) {}
}
