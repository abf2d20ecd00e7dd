//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration and desired state
//! from files.

use std::fs;

use rulesync_domain::{DesiredOrderState, RuleSyncError};
use rulesync_infra::config;
use tempfile::TempDir;

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("rulesync.json");
    fs::write(
        &path,
        r#"{
            "api": {
                "subdomain": "acme",
                "client_id": "integration-id",
                "client_secret": "integration-secret",
                "base_url": "http://localhost:8080/",
                "timeout_secs": 30
            },
            "state": { "path": "/var/lib/rulesync/state.json" }
        }"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should load");

    assert_eq!(config.api.subdomain, "acme");
    assert_eq!(config.api.client_id, "integration-id");
    assert_eq!(config.api.resolved_base_url(), "http://localhost:8080");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.state.path, "/var/lib/rulesync/state.json");
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[api]\nsubdomain = \"acme\"\nclient_id = \"id\"\nclient_secret = \"secret\"\n",
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should load");

    assert_eq!(config.api.resolved_base_url(), "https://acme.onelogin.com");
    assert_eq!(config.api.timeout_secs, 60);
}

#[test]
fn test_invalid_json_is_config_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "api": { "subdomain": "acme" } }"#).expect("Failed to write config");

    match config::load_from_file(Some(path)) {
        Err(RuleSyncError::Config(msg)) => assert!(msg.contains("Invalid JSON format")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_config_debug_redacts_secret() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[api]\nsubdomain = \"acme\"\nclient_id = \"id\"\nclient_secret = \"hunter2\"\n",
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should load");
    assert!(!format!("{config:?}").contains("hunter2"));
}

#[test]
fn test_load_desired_state_from_toml() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("desired.toml");
    fs::write(&path, "enabled = [5, 3, 8]\ndisabled = [1]\n").expect("Failed to write state");

    let desired = config::load_desired_state(&path).expect("desired state should load");
    assert_eq!(desired, DesiredOrderState::new(vec![5, 3, 8], vec![1]));
}

#[test]
fn test_load_desired_state_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = config::load_desired_state(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(RuleSyncError::Config(_))));
}
