//! Mapping order reconciliation
//!
//! Keeps the remote partition of mapping rules into enabled (ordered,
//! positions `1..N`) and disabled (unordered) in line with a
//! [`DesiredOrderState`](rulesync_domain::DesiredOrderState).

pub mod errors;
pub mod partition;
pub mod ports;
pub mod service;

pub use errors::{OrderWarning, OutOfPosition, ReconcileError};
pub use ports::{MappingRepository, ObservedStateStore};
pub use service::{MappingOrderReconciler, ReconcileOutcome, RefreshOutcome};
