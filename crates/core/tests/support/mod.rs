//! Shared test helpers for `rulesync-core` integration tests.
//!
//! Provides in-memory port implementations that behave like the remote
//! mapping collection and record every call made against them.

#![allow(dead_code)]

pub mod repositories;

pub use repositories::{Call, InMemoryMappingRepository, InMemoryStateStore};
