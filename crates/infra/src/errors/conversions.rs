//! Conversions from external infrastructure errors into domain errors.

use rulesync_domain::RuleSyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RuleSyncError);

impl From<InfraError> for RuleSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RuleSyncError> for InfraError {
    fn from(value: RuleSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRuleSyncError {
    fn into_rulesync(self) -> RuleSyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RuleSyncError */
/* -------------------------------------------------------------------------- */

impl IntoRuleSyncError for reqwest::Error {
    fn into_rulesync(self) -> RuleSyncError {
        if self.is_timeout() {
            return RuleSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RuleSyncError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return RuleSyncError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => RuleSyncError::Auth(message),
                404 => RuleSyncError::NotFound(message),
                400..=499 => RuleSyncError::InvalidInput(message),
                _ => RuleSyncError::Network(message),
            };
        }

        if self.is_decode() {
            return RuleSyncError::Serialization(self.to_string());
        }

        RuleSyncError::Network(self.to_string())
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(value: reqwest::Error) -> Self {
        InfraError(value.into_rulesync())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → RuleSyncError */
/* -------------------------------------------------------------------------- */

impl IntoRuleSyncError for std::io::Error {
    fn into_rulesync(self) -> RuleSyncError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => RuleSyncError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                RuleSyncError::Config(format!("permission denied: {self}"))
            }
            _ => RuleSyncError::Internal(format!("I/O error: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_rulesync())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RuleSyncError */
/* -------------------------------------------------------------------------- */

impl IntoRuleSyncError for serde_json::Error {
    fn into_rulesync(self) -> RuleSyncError {
        RuleSyncError::Serialization(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_rulesync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
