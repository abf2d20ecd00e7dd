//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `RULESYNC_SUBDOMAIN`: Account subdomain (required)
//! - `RULESYNC_CLIENT_ID`: OAuth client id (required)
//! - `RULESYNC_CLIENT_SECRET`: OAuth client secret (required)
//! - `RULESYNC_BASE_URL`: Overrides the subdomain-derived base URL
//! - `RULESYNC_TIMEOUT_SECS`: Per-request deadline in seconds (default 60)
//! - `RULESYNC_STATE_PATH`: Observed-state file path
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./rulesync.json` or `./rulesync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use rulesync_domain::constants::{
    DEFAULT_STATE_PATH, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET,
    ENV_STATE_PATH, ENV_SUBDOMAIN, ENV_TIMEOUT_SECS,
};
use rulesync_domain::{ApiConfig, Config, DesiredOrderState, Result, RuleSyncError, StateConfig};
use serde::de::DeserializeOwned;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `RuleSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The subdomain and client credentials must be present; everything else
/// has a default.
///
/// # Errors
/// Returns `RuleSyncError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let subdomain = env_var(ENV_SUBDOMAIN)?;
    let client_id = env_var(ENV_CLIENT_ID)?;
    let client_secret = env_var(ENV_CLIENT_SECRET)?;
    let base_url = std::env::var(ENV_BASE_URL).ok().filter(|url| !url.trim().is_empty());

    let timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| RuleSyncError::Config(format!("Invalid timeout: {}", e)))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    let state_path =
        std::env::var(ENV_STATE_PATH).unwrap_or_else(|_| DEFAULT_STATE_PATH.to_string());

    Ok(Config {
        api: ApiConfig { subdomain, client_id, client_secret, base_url, timeout_secs },
        state: StateConfig { path: state_path },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RuleSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RuleSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RuleSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RuleSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Read a desired order state (`enabled` / `disabled` id lists) from a JSON
/// or TOML file.
///
/// # Errors
/// Returns `RuleSyncError::Config` if the file is missing or malformed.
pub fn load_desired_state(path: &Path) -> Result<DesiredOrderState> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        RuleSyncError::Config(format!("Failed to read desired state {}: {}", path.display(), e))
    })?;
    let desired: DesiredOrderState = parse_by_extension(&contents, path)?;

    tracing::info!(
        path = %path.display(),
        enabled = desired.enabled.len(),
        disabled = desired.disabled.len(),
        "Loaded desired state"
    );
    Ok(desired)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RuleSyncError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    parse_by_extension(contents, path)
}

fn parse_by_extension<T: DeserializeOwned>(contents: &str, path: &Path) -> Result<T> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RuleSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RuleSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RuleSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./rulesync.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("rulesync.json"),
        dir.join("rulesync.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `RuleSyncError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        RuleSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}
