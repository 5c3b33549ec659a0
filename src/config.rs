//! Client settings files
//!
//! Settings are stored as YAML and converted into an [`HttpClientConfig`].
//!
//! ```yaml
//! base_url: https://api.example.com
//! timeout_secs: 10
//! login_path: /auth/login
//! headers:
//!   X-Client: dashboard
//! ```

use crate::auth::DEFAULT_LOGIN_PATH;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Client settings as written in a settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL for relative request paths
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Login page path for session-ended redirects
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Extra default headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            login_path: default_login_path(),
            headers: HashMap::new(),
        }
    }
}

impl ClientSettings {
    /// Convert into a client config
    ///
    /// Headers from the file are added on top of the built-in defaults.
    pub fn into_config(self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .login_path(self.login_path);

        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

/// Load settings from a YAML file
pub fn load_settings(path: impl AsRef<Path>) -> Result<ClientSettings> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read settings file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_settings_from_str(&content)
}

/// Load settings from a YAML string
pub fn load_settings_from_str(yaml: &str) -> Result<ClientSettings> {
    let settings: ClientSettings = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse settings YAML: {e}")))?;

    validate_settings(&settings)?;
    Ok(settings)
}

/// Validate loaded settings
fn validate_settings(settings: &ClientSettings) -> Result<()> {
    if let Some(base_url) = &settings.base_url {
        Url::parse(base_url).map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
    }

    if settings.timeout_secs == 0 {
        return Err(Error::invalid_value(
            "timeout_secs",
            "must be greater than zero",
        ));
    }

    if !settings.login_path.starts_with('/') {
        return Err(Error::invalid_value("login_path", "must start with '/'"));
    }

    Ok(())
}
