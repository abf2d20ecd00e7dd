//! API authentication with the OAuth2 client-credentials grant
//!
//! [`ClientCredentialsExchange`] trades the client id/secret for a bearer
//! token; [`TokenCache`] keeps it until expiry. The API client only sees the
//! [`AccessTokenProvider`] seam.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use rulesync_common::resilience::Clock;
use rulesync_common::{CredentialExchange, IssuedToken, TokenCache};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::paths;
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, refreshing it if needed
    ///
    /// # Errors
    /// [`ApiError::Cancelled`] if `cancel` fires while a refresh is in
    /// flight, otherwise the refresh error.
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, ApiError>;
}

#[async_trait]
impl<E, C> AccessTokenProvider for TokenCache<E, C>
where
    E: CredentialExchange<Error = ApiError>,
    C: Clock,
{
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, ApiError> {
        // Dropping an in-flight refresh leaves the cache empty for the next caller.
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApiError::Cancelled),
            token = self.get_token() => token,
        }
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    /// Lifetime in seconds from `created_at`
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub account_id: Option<i64>,
}

impl From<TokenResponse> for IssuedToken {
    fn from(response: TokenResponse) -> Self {
        IssuedToken::new(
            response.access_token,
            SystemTime::from(response.created_at),
            Duration::from_secs(response.expires_in),
        )
    }
}

/// OAuth2 client-credentials exchange against `/auth/oauth2/v2/token`
pub struct ClientCredentialsExchange {
    http: HttpClient,
    token_url: String,
    client_id: String,
    client_secret: String,
    cancel: CancellationToken,
}

impl ClientCredentialsExchange {
    pub fn new(
        http: HttpClient,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            http,
            token_url: format!("{}{}", base_url.trim_end_matches('/'), paths::TOKEN),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cancel,
        }
    }
}

#[async_trait]
impl CredentialExchange for ClientCredentialsExchange {
    type Error = ApiError;

    async fn exchange(&self) -> Result<IssuedToken, ApiError> {
        debug!(url = %self.token_url, "requesting access token");

        let request = self
            .http
            .request(reqwest::Method::POST, &self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .json(&json!({ "grant_type": "client_credentials" }));

        let response = self.http.send(request, &self.cancel).await?;
        let status = response.status();
        let body = self.http.read_text(response, &self.cancel).await?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "token endpoint rejected credentials");
            return Err(ApiError::Auth(format!(
                "authentication failed with status code {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(token.into())
    }
}
