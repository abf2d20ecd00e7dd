#![allow(dead_code)]

use rulesync_domain::ApiConfig;
use rulesync_infra::api::ApiClient;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/oauth2/v2/token";
pub const ACCESS_TOKEN: &str = "test-access-token";

/// Token endpoint response issued just now and valid for ten hours.
pub fn token_body() -> serde_json::Value {
    json!({
        "access_token": ACCESS_TOKEN,
        "created_at": chrono::Utc::now().to_rfc3339(),
        "expires_in": 36_000,
        "refresh_token": "refresh",
        "token_type": "bearer",
        "account_id": 1
    })
}

/// Serve a long-lived token on the token endpoint.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(server)
        .await;
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    let mut config = ApiConfig::new("test", "client-id", "client-secret");
    config.base_url = Some(server.uri());
    config.timeout_secs = 5;
    config
}

/// Mount a token endpoint and connect a client to `server`.
pub async fn connect(server: &MockServer, cancel: &CancellationToken) -> ApiClient {
    mount_token(server).await;
    ApiClient::connect(&api_config(server), cancel).await.expect("client should authenticate")
}

/// Install a test subscriber once so `RUST_LOG` output is visible on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
