//! # rulesync Domain
//!
//! Business domain types and models for rulesync.
//!
//! This crate contains:
//! - Mapping rule types as the identity provider represents them
//! - Desired and observed order state for enabled/disabled rules
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other rulesync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
