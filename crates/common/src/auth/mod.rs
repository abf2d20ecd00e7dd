//! Bearer token caching for client-credentials APIs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TokenCache    │  Owns the one BearerToken, refreshes on expiry
//! └────────┬────────┘
//!          │
//!          └──► CredentialExchange  (trades credentials for an IssuedToken)
//! ```
//!
//! # Usage Example
//!
//! ```
//! use std::time::{Duration, SystemTime};
//!
//! use async_trait::async_trait;
//! use rulesync_common::auth::{CredentialExchange, IssuedToken, TokenCache};
//!
//! struct Static;
//!
//! #[async_trait]
//! impl CredentialExchange for Static {
//!     type Error = std::io::Error;
//!
//!     async fn exchange(&self) -> Result<IssuedToken, Self::Error> {
//!         Ok(IssuedToken::new("abc", SystemTime::now(), Duration::from_secs(3600)))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let cache = TokenCache::new(Static);
//! assert_eq!(cache.get_token().await.unwrap(), "abc");
//! # });
//! ```

pub mod token_cache;
pub mod traits;
pub mod types;

pub use token_cache::TokenCache;
pub use traits::CredentialExchange;
pub use types::{BearerToken, IssuedToken};
