//! Domain types and models

pub mod mapping;
pub mod order;

pub use mapping::{MappingAction, MappingCondition, MappingId, MappingRule, MatchMode};
pub use order::{DesiredOrderState, ObservedOrderState};
