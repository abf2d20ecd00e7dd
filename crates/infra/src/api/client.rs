//! API client with per-request retry policy
//!
//! Every call is described by a [`RequestSpec`]. The client attaches the
//! bearer token, sends one bounded attempt at a time, and retries only the
//! statuses the request's [`RetryPolicy`](rulesync_common::RetryPolicy) lists,
//! waiting `base * 2^(exponent_base * attempt)` between attempts.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use rulesync_common::{sleep_or_cancel, TokenCache};
use rulesync_domain::ApiConfig;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::auth::{AccessTokenProvider, ClientCredentialsExchange};
use super::errors::ApiError;
use super::paged::PageSizeTable;
use super::request::RequestSpec;
use crate::http::HttpClient;

/// Authenticated client for the identity-provider REST API
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
    page_sizes: PageSizeTable,
}

impl ApiClient {
    /// Create a client from its parts
    pub fn new(
        http: HttpClient,
        auth: Arc<dyn AccessTokenProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, auth, base_url, page_sizes: PageSizeTable::default() }
    }

    /// Replace the page-size ceilings used by paged fetches
    pub fn with_page_sizes(mut self, page_sizes: PageSizeTable) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    /// Build a client from configuration and authenticate immediately.
    ///
    /// The token exchange shares `cancel` with every later request.
    ///
    /// # Errors
    /// [`ApiError::Config`] if the HTTP client cannot be built, or the token
    /// exchange error when the credentials are rejected.
    #[instrument(skip_all, fields(subdomain = %config.subdomain))]
    pub async fn connect(config: &ApiConfig, cancel: &CancellationToken) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        let base_url = config.resolved_base_url();
        let exchange = ClientCredentialsExchange::new(
            http.clone(),
            &base_url,
            config.client_id.clone(),
            config.client_secret.clone(),
            cancel.clone(),
        );
        let tokens = Arc::new(TokenCache::new(exchange));
        tokens.access_token(cancel).await?;
        info!(base_url = %base_url, "authenticated against identity provider");

        Ok(Self::new(http, tokens, base_url))
    }

    pub fn page_sizes(&self) -> &PageSizeTable {
        &self.page_sizes
    }

    /// Execute `spec` and decode the JSON response body into `T`.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] on 404, [`ApiError::HttpStatus`] on any other
    /// final non-2xx, [`ApiError::Decode`] if the body does not match `T`,
    /// [`ApiError::Cancelled`] if `cancel` fires, transport errors as-is.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let result = match self.execute_text(spec, cancel).await {
            Ok(body) => serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string())),
            Err(err) => Err(err),
        };
        Self::log_outcome(spec, result)
    }

    /// Execute `spec`, discarding the response body.
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute) minus decoding.
    pub async fn execute_empty(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let result = self.execute_text(spec, cancel).await.map(|_| ());
        Self::log_outcome(spec, result)
    }

    async fn execute_text(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        info!(method = %spec.method, path = %spec.path, "executing request");

        let mut attempt = 0u32;
        let response = loop {
            let response = self.send_once(spec, cancel).await?;
            let status = response.status().as_u16();
            if !spec.retry.should_retry(attempt, status) {
                break response;
            }

            let wait = spec.retry.delay_for(attempt);
            info!(
                method = %spec.method,
                path = %spec.path,
                status,
                retry_num = attempt + 1,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "retrying request"
            );
            drop(response);
            sleep_or_cancel(wait, cancel).await.map_err(|_| ApiError::Cancelled)?;
            attempt += 1;
        };

        let status = response.status();
        let body = self.http.read_text(response, cancel).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { path: spec.path.clone() });
        }
        if !status.is_success() {
            return Err(ApiError::HttpStatus { status: status.as_u16(), body });
        }
        Ok(body)
    }

    /// One authenticated attempt; the token is fetched per attempt so a
    /// long backoff cannot outlive it.
    pub(crate) async fn send_once(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<Response, ApiError> {
        let token = self.auth.access_token(cancel).await?;
        let url = format!("{}{}", self.base_url, spec.path);

        let mut request = self.http.request(spec.method.clone(), &url).bearer_auth(token);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.header(CONTENT_TYPE, "application/json").body(body.clone());
        }

        Ok(self.http.send(request, cancel).await?)
    }

    pub(crate) async fn read_body(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        Ok(self.http.read_text(response, cancel).await?)
    }

    fn log_outcome<T>(spec: &RequestSpec, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match &result {
            Ok(_) => info!(method = %spec.method, path = %spec.path, "request succeeded"),
            Err(err) if err.is_not_found() => {
                debug!(method = %spec.method, path = %spec.path, "resource not found");
            }
            Err(err) => {
                error!(method = %spec.method, path = %spec.path, error = %err, "request failed");
            }
        }
        result
    }
}
