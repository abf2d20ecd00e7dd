//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Client configuration constants
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STATE_PATH: &str = "rulesync-state.json";

// Membership toggles are retried on transient statuses. 404 is included
// because a freshly written rule can briefly read as missing.
pub const TOGGLE_RETRY_COUNT: u32 = 10;
pub const TOGGLE_RETRY_BASE_MS: u64 = 1_000;
pub const TOGGLE_RETRY_EXPONENT_BASE: u32 = 1;
pub const TOGGLE_RETRIABLE_STATUS_CODES: [u16; 5] = [404, 429, 500, 502, 504];

// Environment variable names
pub const ENV_SUBDOMAIN: &str = "RULESYNC_SUBDOMAIN";
pub const ENV_CLIENT_ID: &str = "RULESYNC_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "RULESYNC_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "RULESYNC_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RULESYNC_TIMEOUT_SECS";
pub const ENV_STATE_PATH: &str = "RULESYNC_STATE_PATH";
