//! Mapping rule repository over the identity-provider API

pub mod repository;

pub use repository::{default_toggle_policy, ApiMappingRepository};
