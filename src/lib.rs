//! # Bearer Client
//!
//! An HTTP client layer that attaches the current bearer token to every
//! request and ends the session when the server rejects it.
//!
//! ## Features
//!
//! - **Token Attachment**: `Authorization: Bearer <token>` on every request,
//!   looked up fresh each time, omitted when there is no token
//! - **Logout on Auth Failure**: 401/403 and `Invalid Token` responses clear
//!   the token and redirect to the login page
//! - **Interceptors**: pluggable hooks around every request
//! - **Typed Failures**: non-success responses keep status, status text and body
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bearer_client::auth::{MemoryTokenStore, RecordingNavigator, TokenStore};
//! use bearer_client::http::{HttpClient, HttpClientConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bearer_client::Result<()> {
//!     let store = Arc::new(MemoryTokenStore::new());
//!     let navigator = Arc::new(RecordingNavigator::new());
//!
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .build();
//!     let client = HttpClient::with_bearer_auth(config, store.clone(), Some(navigator))?;
//!
//!     // After login
//!     store.set_token("abc123")?;
//!     client.update_bearer_token();
//!
//!     let profile: serde_json::Value = client.get_json("/me").await?;
//!     println!("{profile}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;

// Re-exports for convenience
pub use error::{Error, HttpFailure, ResponseData, Result};
