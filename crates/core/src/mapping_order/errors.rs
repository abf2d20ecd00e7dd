//! Reconciliation failures and read-only warnings

use std::fmt;

use rulesync_domain::{MappingId, RuleSyncError};
use thiserror::Error;

/// An enabled rule whose position differs from its rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfPosition {
    pub id: MappingId,
    pub actual: i64,
    pub expected: i64,
}

impl fmt::Display for OutOfPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.id, self.actual, self.expected)
    }
}

fn table(rows: &[OutOfPosition]) -> String {
    let mut out = String::from("id, actual_pos, expected_pos");
    for row in rows {
        out.push('\n');
        out.push_str(&row.to_string());
    }
    out
}

/// Terminal failure of one reconciliation attempt
///
/// Every variant except [`Remote`](Self::Remote) describes remote or
/// desired state that cannot be converged without a human decision.
/// Re-invoking after fixing the cause is safe: the reconciler always
/// re-derives the remote state first.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("duplicate ids in desired state: {ids:?}")]
    DuplicateIdInDesiredState { ids: Vec<MappingId> },

    #[error(
        "desired state does not cover the remote mappings \
         (extra in desired: {extra_in_desired:?}, extra in remote: {extra_in_remote:?})"
    )]
    SetMismatch { extra_in_desired: Vec<MappingId>, extra_in_remote: Vec<MappingId> },

    #[error("enabled mappings cannot have a null position: {ids:?}")]
    NullPosition { ids: Vec<MappingId> },

    #[error("mapping positions are not contiguous from 1:\n{}", table(.0))]
    InvariantViolation(Vec<OutOfPosition>),

    #[error(
        "found difference in disabled mappings between remote and recorded state \
         (recorded but not disabled remotely: {missing_remotely:?}, \
         disabled remotely but not recorded: {unexpected_remotely:?})"
    )]
    DisabledDrift { missing_remotely: Vec<MappingId>, unexpected_remotely: Vec<MappingId> },

    #[error("membership toggle for mapping {expected} echoed id {actual}")]
    ToggleMismatch { expected: MappingId, actual: MappingId },

    #[error("reorder echoed {actual} ids, expected {expected}")]
    ReorderLengthMismatch { expected: usize, actual: usize },

    #[error("reorder echo differs at index {index}: expected {expected}, got {actual}")]
    ReorderOrderMismatch { index: usize, expected: MappingId, actual: MappingId },

    #[error(transparent)]
    Remote(#[from] RuleSyncError),
}

impl ReconcileError {
    /// Whether the attempt was stopped by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Remote(RuleSyncError::Cancelled))
    }
}

/// Anomaly surfaced by a read-only refresh instead of failing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWarning {
    /// Enabled positions do not form `1..N`
    PositionsNotContiguous(Vec<OutOfPosition>),
}

impl fmt::Display for OrderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionsNotContiguous(rows) => {
                write!(f, "mapping positions are not linearly increasing starting at 1:\n{}", table(rows))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violation_lists_offending_rows() {
        let err = ReconcileError::InvariantViolation(vec![OutOfPosition {
            id: 9,
            actual: 4,
            expected: 3,
        }]);
        let message = err.to_string();
        assert!(message.contains("id, actual_pos, expected_pos"));
        assert!(message.contains("9, 4, 3"));
    }

    #[test]
    fn remote_errors_pass_through() {
        let err = ReconcileError::from(RuleSyncError::Cancelled);
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Operation cancelled");
    }
}
