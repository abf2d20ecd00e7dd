//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and files, and for reading desired-state
//! documents.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_desired_state, load_from_env, load_from_file, parse_config, probe_config_paths,
};
