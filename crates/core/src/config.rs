//! Client configuration
//!
//! Loaded from `config.toml` in the platform config directory. A missing
//! file yields defaults; `TUTORHUB_API_URL` overrides the base URL.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "TUTORHUB_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://tutoring.example.edu`
    pub api_base_url: String,
    /// Sent as the User-Agent header when set
    pub user_agent: Option<String>,
    /// Request timeout. `None` keeps the transport default.
    pub request_timeout_secs: Option<u64>,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: None,
            request_timeout_secs: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Self::default().normalized();
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        tracing::info!(path = %path.display(), "Loaded config");
        config.normalized()
    }

    /// Platform config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("edu", "tutorhub", "tutorhub")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn with_env_override(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(url = %url, "API base URL overridden from environment");
            self.api_base_url = url;
        }
        self.normalized()
    }

    /// Check the base URL scheme and strip trailing slashes
    fn normalized(mut self) -> Result<Self> {
        let url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_base_url must start with http:// or https://, got {:?}",
                self.api_base_url
            )));
        }
        self.api_base_url = url;
        Ok(self)
    }

    /// Absolute URL for an API path such as `/api/user/me`
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}
