//! Configuration structures
//!
//! Loaded by `rulesync_infra::config` from environment variables or a JSON /
//! TOML file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STATE_PATH, DEFAULT_TIMEOUT_SECS};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub state: StateConfig,
}

/// Identity-provider API connection settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Account subdomain; requests go to `https://{subdomain}.onelogin.com`
    pub subdomain: String,
    pub client_id: String,
    pub client_secret: String,
    /// Overrides the subdomain-derived base URL (test servers, proxies)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(
        subdomain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Base URL every API path is appended to
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.onelogin.com", self.subdomain),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("subdomain", &self.subdomain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Where the reconciled observed state is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    pub path: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self { path: DEFAULT_STATE_PATH.to_string() }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
