//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for rulesync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RuleSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuleSyncError {
    /// Whether the error is the distinguished "resource does not exist"
    /// condition. Idempotent deletes treat it as success.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for rulesync operations
pub type Result<T> = std::result::Result<T, RuleSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = RuleSyncError::NotFound("mapping 42".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "mapping 42");
    }

    #[test]
    fn cancelled_has_no_payload() {
        let json = serde_json::to_value(RuleSyncError::Cancelled).unwrap();
        assert_eq!(json["type"], "Cancelled");
        assert_eq!(RuleSyncError::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn not_found_is_distinguished() {
        assert!(RuleSyncError::NotFound("x".into()).is_not_found());
        assert!(!RuleSyncError::Network("x".into()).is_not_found());
    }
}
