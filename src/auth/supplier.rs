//! Token suppliers
//!
//! The token itself belongs to an external authentication service. The client
//! only ever asks for the current value and, on an auth failure, asks for it
//! to be discarded.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Source of the current bearer token
///
/// Both operations are synchronous: they are called from inside request and
/// error hooks, which never suspend.
pub trait TokenSupplier: Send + Sync {
    /// The current token, or `None` when the user is logged out
    fn get_token(&self) -> Option<String>;

    /// Discard the stored token
    fn clear_token(&self);
}

/// A token supplier that can also accept a new token after login
pub trait TokenStore: TokenSupplier {
    /// Replace the stored token
    fn set_token(&self, token: &str) -> Result<()>;
}

/// Treat empty tokens as absent
pub(crate) fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenSupplier for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
        non_empty(token.clone())
    }

    fn clear_token(&self) {
        let mut token = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *token = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_token(&self, token: &str) -> Result<()> {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_string());
        Ok(())
    }
}

/// On-disk representation of a stored token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// The bearer token
    pub token: String,
    /// When the token was saved
    pub saved_at: DateTime<Utc>,
}

/// Token store backed by a JSON file
///
/// The file is read on every lookup so a login performed by another process
/// is picked up by the next request.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token record, if any
    pub fn load(&self) -> Result<Option<StoredToken>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        let stored: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(stored))
    }
}

impl TokenSupplier for FileTokenStore {
    fn get_token(&self) -> Option<String> {
        match self.load() {
            Ok(stored) => non_empty(stored.map(|s| s.token)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    fn clear_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed token file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn set_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content).map_err(|e| {
            Error::token_store(format!(
                "Failed to write token file '{}': {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "Saved token file");
        Ok(())
    }
}
