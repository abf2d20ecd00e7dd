//! # rulesync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the remote mapping collection and
//!   local state persistence
//! - The mapping order reconciler and per-rule CRUD service
//!
//! ## Architecture Principles
//! - Only depends on `rulesync-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits

pub mod mapping_order;
pub mod mapping_rule;

pub use mapping_order::{
    MappingOrderReconciler, MappingRepository, ObservedStateStore, OrderWarning, OutOfPosition,
    ReconcileError, ReconcileOutcome, RefreshOutcome,
};
pub use mapping_rule::MappingRuleService;
