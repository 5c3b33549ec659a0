//! Login redirects
//!
//! A navigator is only present when there is a UI to send the user to. Without
//! one, logging out just clears the token.

use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Default path of the login page
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Performs a full navigation to a path
pub trait Navigator: Send + Sync {
    /// Navigate to `path`
    fn navigate(&self, path: &str);
}

/// Navigator that remembers every path it was sent to
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a navigator with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to, oldest first
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent navigation target
    pub fn last(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

/// Navigator for terminals: tells the user where to log in again
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(login_path = path, "Session ended, log in again");
    }
}
