//! Error types for the bearer client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! A failed HTTP response is not an opaque string: [`HttpFailure`] keeps the
//! status code, status text and decoded body so auth failure classification
//! can inspect each of them directly.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The main error type for the bearer client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Token Store Errors
    // ============================================================================
    #[error("Token store error: {message}")]
    TokenStore { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", .0.message())]
    Response(HttpFailure),

    #[error("Invalid value for header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a token store error
    pub fn token_store(message: impl Into<String>) -> Self {
        Self::TokenStore {
            message: message.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The human-readable message of this error
    ///
    /// For failed responses this is `Request failed with status code <N>`,
    /// the exact wording auth failure classification compares against.
    pub fn message(&self) -> String {
        match self {
            Error::Response(failure) => failure.message(),
            other => other.to_string(),
        }
    }

    /// Status code of the failed response, if there was one
    pub fn status(&self) -> Option<StatusCode> {
        self.failure().map(|f| f.status)
    }

    /// Status text of the failed response, if there was one
    pub fn status_text(&self) -> Option<&str> {
        self.failure().map(|f| f.status_text.as_str())
    }

    /// Decoded body of the failed response, if there was one
    pub fn response_data(&self) -> Option<&ResponseData> {
        self.failure().map(|f| &f.data)
    }

    /// The failed response carried by this error
    pub fn failure(&self) -> Option<&HttpFailure> {
        match self {
            Error::Response(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result type alias for the bearer client
pub type Result<T> = std::result::Result<T, Error>;

/// A response that came back with a non-success status
#[derive(Debug, Clone)]
pub struct HttpFailure {
    /// Method of the request that failed
    pub method: Method,
    /// Final URL of the request
    pub url: String,
    /// Response status code
    pub status: StatusCode,
    /// Reason phrase for the status code (empty for non-standard codes)
    pub status_text: String,
    /// Decoded response body
    pub data: ResponseData,
}

impl HttpFailure {
    /// Build a failure from a status and raw body bytes
    pub fn new(method: Method, url: impl Into<String>, status: StatusCode, body: &[u8]) -> Self {
        Self {
            method,
            url: url.into(),
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            data: ResponseData::from_bytes(body),
        }
    }

    /// `Request failed with status code <N>`
    pub fn message(&self) -> String {
        format!("Request failed with status code {}", self.status.as_u16())
    }
}

/// Response body after content decoding
///
/// Bodies that parse as JSON are kept as JSON; anything else is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// No body at all
    Empty,
    /// Body parsed as JSON
    Json(Value),
    /// Body that was not valid JSON
    Text(String),
}

impl ResponseData {
    /// Decode a raw response body
    pub fn from_bytes(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_slice(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// The body as a string, if it is plain text or a JSON string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether the body is exactly the given string
    pub fn is_literal(&self, literal: &str) -> bool {
        self.as_str() == Some(literal)
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
