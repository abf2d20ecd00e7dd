//! Modular common utilities shared across rulesync crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: async infrastructure (clock abstraction, retry policy,
//!   cancellable waits)
//! - `platform`: credential handling (bearer token cache)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{BearerToken, CredentialExchange, IssuedToken, TokenCache};
#[cfg(feature = "runtime")]
pub use resilience::{
    sleep_or_cancel, Cancelled, Clock, MockClock, RetryPolicy, RetryPolicyBuilder, SystemClock,
};
