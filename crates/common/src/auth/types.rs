//! Token types

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Token returned by a credential exchange
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// When the server minted the token
    pub issued_at: SystemTime,
    /// Lifetime from `issued_at`
    pub ttl: Duration,
}

impl IssuedToken {
    pub fn new(access_token: impl Into<String>, issued_at: SystemTime, ttl: Duration) -> Self {
        Self { access_token: access_token.into(), issued_at, ttl }
    }

    pub fn expires_at(&self) -> SystemTime {
        self.issued_at.checked_add(self.ttl).unwrap_or(self.issued_at)
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Cached bearer token
///
/// Starts invalid with an epoch expiry so the first use always refreshes.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    value: String,
    expires_at: SystemTime,
}

impl BearerToken {
    /// An empty token that is expired at every instant
    pub fn invalid() -> Self {
        Self { value: String::new(), expires_at: UNIX_EPOCH }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// `true` while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

impl Default for BearerToken {
    fn default() -> Self {
        Self::invalid()
    }
}

impl From<IssuedToken> for BearerToken {
    fn from(issued: IssuedToken) -> Self {
        let expires_at = issued.expires_at();
        Self { value: issued.access_token, expires_at }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
