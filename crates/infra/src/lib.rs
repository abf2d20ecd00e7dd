//! # rulesync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The identity-provider API client (OAuth2 token, retry, pagination)
//! - [`ApiMappingRepository`], the HTTP-backed mapping repository
//! - [`JsonFileStateStore`], file persistence of the observed order state
//! - Configuration loading from environment and JSON/TOML files
//!
//! ## Architecture
//! - Implements traits defined in `rulesync-core`
//! - Depends on `rulesync-common` and `rulesync-domain`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod mappings;
pub mod state;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, RequestSpec};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, HttpError};
pub use mappings::ApiMappingRepository;
pub use state::JsonFileStateStore;
