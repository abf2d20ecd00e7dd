//! API-specific error types
//!
//! Provides error classification for identity-provider API operations.

use std::time::Duration;

use rulesync_domain::RuleSyncError;
use thiserror::Error;

use crate::http::HttpError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403, token endpoint failures)
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth), bad payloads
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Configuration errors
    Config,
    /// The caller cancelled the operation
    Cancelled,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("request failed with status code {status}\n{body}")]
    HttpStatus { status: u16, body: String },

    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("bad gateway: {0}")]
    BadGateway(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("missing Total-Pages header")]
    MissingPaginationMetadata,

    #[error("invalid Total-Pages header: {0:?}")]
    InvalidPaginationMetadata(String),

    #[error("max page size not configured for path {0}")]
    PageSizeNotConfigured(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::HttpStatus { status: 401 | 403, .. } => ApiErrorCategory::Authentication,
            Self::RateLimited | Self::HttpStatus { status: 429, .. } => ApiErrorCategory::RateLimit,
            Self::BadGateway(_) => ApiErrorCategory::Server,
            Self::HttpStatus { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::NotFound { .. }
            | Self::HttpStatus { .. }
            | Self::Serialization(_)
            | Self::Decode(_)
            | Self::MissingPaginationMetadata
            | Self::InvalidPaginationMetadata(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) | Self::PageSizeNotConfigured(_) => ApiErrorCategory::Config,
            Self::Cancelled => ApiErrorCategory::Cancelled,
        }
    }

    /// The distinguished "resource does not exist" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::HttpStatus { status, .. } => Some(*status),
            Self::BadGateway(_) => Some(502),
            Self::RateLimited => Some(429),
            _ => None,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(after) => Self::Timeout(after),
            HttpError::Cancelled => Self::Cancelled,
            HttpError::Transport(err) if err.is_builder() => Self::Config(err.to_string()),
            HttpError::Transport(err) => Self::Network(err.to_string()),
        }
    }
}

impl From<ApiError> for RuleSyncError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err.category() {
            _ if err.is_not_found() => Self::NotFound(message),
            ApiErrorCategory::Cancelled => Self::Cancelled,
            ApiErrorCategory::Authentication => Self::Auth(message),
            ApiErrorCategory::Config => Self::Config(message),
            ApiErrorCategory::RateLimit
            | ApiErrorCategory::Server
            | ApiErrorCategory::Network => Self::Network(message),
            ApiErrorCategory::Client => match err {
                ApiError::Serialization(_) | ApiError::Decode(_) => Self::Serialization(message),
                ApiError::HttpStatus { .. } => Self::InvalidInput(message),
                _ => Self::Internal(message),
            },
        }
    }
}
