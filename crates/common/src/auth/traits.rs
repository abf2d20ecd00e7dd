//! Traits for credential exchange
//!
//! Abstracts the token endpoint so [`TokenCache`](super::TokenCache) can be
//! tested without a server.

use async_trait::async_trait;

use super::types::IssuedToken;

/// Trades long-lived credentials for a short-lived bearer token
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Error produced by the exchange; propagated unchanged by the cache
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform one exchange against the token endpoint
    ///
    /// # Errors
    /// Returns the implementation's error if the endpoint rejects the
    /// credentials or cannot be reached.
    async fn exchange(&self) -> Result<IssuedToken, Self::Error>;
}
