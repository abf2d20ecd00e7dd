//! Bearer token cache with refresh on expiry
//!
//! One token per cache. The token lives behind an async mutex that is held
//! across the exchange, so concurrent callers queue behind a single refresh
//! instead of each hitting the token endpoint.

use std::time::SystemTime;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::traits::CredentialExchange;
use super::types::BearerToken;
use crate::resilience::{Clock, SystemClock};

/// Token cache backed by a [`CredentialExchange`]
pub struct TokenCache<E: CredentialExchange, C: Clock = SystemClock> {
    exchange: E,
    clock: C,
    token: Mutex<BearerToken>,
}

impl<E: CredentialExchange> TokenCache<E, SystemClock> {
    /// Create an empty cache using the system clock
    pub fn new(exchange: E) -> Self {
        Self::with_clock(exchange, SystemClock)
    }
}

impl<E: CredentialExchange, C: Clock> TokenCache<E, C> {
    /// Create an empty cache with an injected clock
    pub fn with_clock(exchange: E, clock: C) -> Self {
        Self { exchange, clock, token: Mutex::new(BearerToken::invalid()) }
    }

    /// Get a valid token, refreshing if the cached one has expired
    ///
    /// # Errors
    /// Returns the exchange error unchanged if a refresh was needed and
    /// failed. The cache is left empty so the next call tries again.
    pub async fn get_token(&self) -> Result<String, E::Error> {
        let now = self.clock.system_time();
        self.get_token_at(now).await
    }

    /// [`get_token`](Self::get_token) with an explicit wall-clock time
    ///
    /// # Errors
    /// See [`get_token`](Self::get_token).
    pub async fn get_token_at(&self, now: SystemTime) -> Result<String, E::Error> {
        let mut token = self.token.lock().await;
        if token.is_valid_at(now) {
            return Ok(token.value().to_string());
        }

        debug!("bearer token missing or expired, refreshing");
        match self.exchange.exchange().await {
            Ok(issued) => {
                *token = BearerToken::from(issued);
                info!(expires_at = ?token.expires_at(), "bearer token refreshed");
                Ok(token.value().to_string())
            }
            Err(err) => {
                *token = BearerToken::invalid();
                warn!(error = %err, "bearer token refresh failed");
                Err(err)
            }
        }
    }

    /// Drop the cached token so the next call refreshes
    pub async fn invalidate(&self) {
        *self.token.lock().await = BearerToken::invalid();
    }

    /// Expiry of the cached token (the UNIX epoch when empty)
    pub async fn expires_at(&self) -> SystemTime {
        self.token.lock().await.expires_at()
    }
}
