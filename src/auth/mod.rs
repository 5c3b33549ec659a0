//! Authentication module
//!
//! Supplies the bearer token for outgoing requests and reacts to auth
//! failures by clearing it and redirecting to the login page.
//!
//! - [`TokenSupplier`] - boundary to the service that owns the token
//! - [`Navigator`] - optional UI context for the login redirect
//! - [`classify`] - decides whether a failed call ended the session
//! - [`BearerAuth`] - the interceptor tying them together

mod classify;
mod interceptor;
mod navigator;
mod supplier;

pub use classify::{
    classify, AuthFailure, FORBIDDEN_MESSAGE, INVALID_TOKEN_BODY, UNAUTHORIZED_STATUS_TEXT,
};
pub use interceptor::{apply_token, bearer_value, BearerAuth};
pub use navigator::{LogNavigator, Navigator, RecordingNavigator, DEFAULT_LOGIN_PATH};
pub use supplier::{FileTokenStore, MemoryTokenStore, StoredToken, TokenStore, TokenSupplier};
