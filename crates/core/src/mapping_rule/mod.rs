//! Per-rule CRUD for mapping rules

pub mod service;

pub use service::MappingRuleService;
