//! Bearer token interceptor
//!
//! Attaches the current token to every outgoing request and ends the session
//! when a call fails with an auth error.

use super::classify::{classify, AuthFailure};
use super::navigator::{Navigator, DEFAULT_LOGIN_PATH};
use super::supplier::{non_empty, TokenSupplier};
use crate::error::{Error, Result};
use crate::http::{Interceptor, OutgoingRequest};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Build the `Authorization` value for a token
pub fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::invalid_header(AUTHORIZATION.as_str(), e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Set or remove `Authorization` in a header map from the supplier's token
///
/// Returns whether a token was attached.
pub fn apply_token(headers: &mut HeaderMap, supplier: &dyn TokenSupplier) -> Result<bool> {
    match non_empty(supplier.get_token()) {
        Some(token) => {
            headers.insert(AUTHORIZATION, bearer_value(&token)?);
            Ok(true)
        }
        None => {
            headers.remove(AUTHORIZATION);
            Ok(false)
        }
    }
}

/// Interceptor that manages the bearer token of a client
pub struct BearerAuth {
    supplier: Arc<dyn TokenSupplier>,
    navigator: Option<Arc<dyn Navigator>>,
    login_path: String,
}

impl BearerAuth {
    /// Create an interceptor with no navigator
    pub fn new(supplier: Arc<dyn TokenSupplier>) -> Self {
        Self {
            supplier,
            navigator: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Redirect through `navigator` when the session ends
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Override the login page path
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// The token supplier
    pub fn supplier(&self) -> &Arc<dyn TokenSupplier> {
        &self.supplier
    }

    /// Inspect a failed call and end the session on auth failures
    ///
    /// The error is only observed; the caller still receives it.
    pub fn handle_error(&self, err: &Error) -> Vec<AuthFailure> {
        let failures = classify(err);

        for failure in &failures {
            warn!(?failure, status = ?err.status(), "Authentication failure, logging out");
            self.logout();
        }

        error!(error = %err, "An error occurred");
        failures
    }

    /// Clear the token and send the user to the login page
    pub fn logout(&self) {
        self.supplier.clear_token();
        if let Some(navigator) = &self.navigator {
            navigator.navigate(&self.login_path);
        }
    }
}

impl Interceptor for BearerAuth {
    fn on_request(&self, request: &mut OutgoingRequest) -> Result<()> {
        if apply_token(&mut request.headers, self.supplier.as_ref())? {
            debug!(url = %request.url, "Attached bearer token");
        } else {
            debug!(url = %request.url, "No bearer token available");
        }
        Ok(())
    }

    fn on_request_error(&self, err: &Error) {
        self.handle_error(err);
    }

    fn on_response_error(&self, err: &Error) {
        self.handle_error(err);
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("has_navigator", &self.navigator.is_some())
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}
