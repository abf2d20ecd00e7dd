use std::future::Future;
use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use rulesync_domain::constants::DEFAULT_TIMEOUT_SECS;
use rulesync_domain::RuleSyncError;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::InfraError;

/// Failure of a single HTTP exchange
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// HTTP client performing one bounded attempt per call.
///
/// Every exchange (send and body read) is limited by the configured timeout
/// and aborts as soon as the caller's cancellation token fires. Retries are
/// the caller's decision.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send one request.
    ///
    /// # Errors
    /// [`HttpError::Timeout`] past the deadline, [`HttpError::Cancelled`] if
    /// `cancel` fires first, [`HttpError::Transport`] for connection or
    /// request-building failures. Non-2xx statuses are not errors here.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, HttpError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.bounded(self.client.execute(request), cancel).await? {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(HttpError::Transport(err))
            }
        }
    }

    /// Read a response body as text under the same deadline and cancellation.
    pub async fn read_text(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<String, HttpError> {
        Ok(self.bounded(response.text(), cancel).await??)
    }

    async fn bounded<F>(&self, future: F, cancel: &CancellationToken) -> Result<F::Output, HttpError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(HttpError::Cancelled),
            result = tokio::time::timeout(self.timeout, future) => {
                result.map_err(|_| HttpError::Timeout(self.timeout))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("rulesync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, RuleSyncError> {
        let client = ReqwestClient::builder()
            .no_proxy()
            .user_agent(self.user_agent)
            .build()
            .map_err(|err| RuleSyncError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(timeout: Duration) -> HttpClient {
        HttpClient::builder().timeout(timeout).build().expect("http client")
    }

    #[tokio::test]
    async fn sends_exactly_once_even_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        let response = client.send(client.request(Method::GET, server.uri()), &cancel).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(client.read_text(response, &cancel).await.unwrap(), "boom");
    }

    #[tokio::test]
    async fn applies_default_user_agent() {
        let server = MockServer::start().await;
        Mock::given(header("user-agent", concat!("rulesync/", env!("CARGO_PKG_VERSION"))))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(Duration::from_secs(5));
        let response = client
            .send(client.request(Method::GET, server.uri()), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = client(Duration::from_millis(100));
        let err = client
            .send(client.request(Method::GET, server.uri()), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = client(Duration::from_secs(30));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = client.send(client.request(Method::GET, server.uri()), &cancel).await.unwrap_err();

        assert!(matches!(err, HttpError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
