//! HTTP client module
//!
//! Provides an HTTP client whose requests run through interceptors.
//!
//! # Features
//!
//! - **Interceptors**: hooks before sending and after each response or failure
//! - **Default Headers**: shared, mutable at runtime (e.g. after login)
//! - **Typed Failures**: non-success responses keep status, status text and body
//! - **Authentication**: integration with the auth module

mod client;
mod interceptor;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use interceptor::{Interceptor, OutgoingRequest};

#[cfg(test)]
mod tests;
