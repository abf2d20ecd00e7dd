//! Identity-provider API client
//!
//! - [`ApiClient::execute`]: authenticated request with a per-call
//!   [`RetryPolicy`](rulesync_common::RetryPolicy) and cancellable backoff
//! - [`ApiClient::fetch_page`] / [`ApiClient::fetch_all`]: paginated lists
//!   driven by the `Total-Pages` header
//! - [`ClientCredentialsExchange`]: OAuth2 client-credentials token endpoint,
//!   cached by [`TokenCache`](rulesync_common::TokenCache)
//!
//! Every outbound request is bounded by the configured timeout and aborts
//! when the caller's cancellation token fires.

pub mod auth;
pub mod client;
pub mod errors;
pub mod paged;
pub mod paths;
pub mod request;

pub use auth::{AccessTokenProvider, ClientCredentialsExchange, TokenResponse};
pub use client::ApiClient;
pub use errors::{ApiError, ApiErrorCategory};
pub use paged::{Page, PageOutcome, PageSizeTable};
pub use request::{QueryParams, RequestSpec};
