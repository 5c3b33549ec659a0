//! Auth failure classification
//!
//! Both checks compare exact strings produced by the HTTP layer and the
//! server. They are kept verbatim for compatibility with existing backends,
//! which makes them sensitive to wording changes on either side.

use crate::error::Error;
use reqwest::StatusCode;

/// Message of a failed response with status 403
pub const FORBIDDEN_MESSAGE: &str = "Request failed with status code 403";

/// Body the server sends when it rejects a token
pub const INVALID_TOKEN_BODY: &str = "Invalid Token";

/// Status text of a 401 response
pub const UNAUTHORIZED_STATUS_TEXT: &str = "Unauthorized";

/// Kinds of failure that end the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// 403 response, or a body of exactly `Invalid Token`
    InvalidToken,
    /// 401 status, or a status text of `Unauthorized`
    Unauthorized,
}

/// Classify an error
///
/// The checks are independent: an error can match both, in which case both
/// kinds are returned, `InvalidToken` first. Unclassified errors yield an
/// empty list.
pub fn classify(error: &Error) -> Vec<AuthFailure> {
    let mut failures = Vec::with_capacity(2);

    if is_invalid_token(error) {
        failures.push(AuthFailure::InvalidToken);
    }
    if is_unauthorized(error) {
        failures.push(AuthFailure::Unauthorized);
    }

    failures
}

fn is_invalid_token(error: &Error) -> bool {
    error.message() == FORBIDDEN_MESSAGE
        || error
            .response_data()
            .is_some_and(|data| data.is_literal(INVALID_TOKEN_BODY))
}

fn is_unauthorized(error: &Error) -> bool {
    error.failure().is_some_and(|failure| {
        failure.status == StatusCode::UNAUTHORIZED
            || failure.status_text == UNAUTHORIZED_STATUS_TEXT
    })
}
