//! Retry policy with status-code allowlist and exponential backoff
//!
//! The wait before retry `i` (0-based) is
//! `backoff_base * 2^(backoff_exponent_base * i)`:
//!
//! | exponent base | waits (base = 1s)      |
//! |---------------|------------------------|
//! | 0             | 1s, 1s, 1s, ...        |
//! | 1             | 1s, 2s, 4s, 8s, ...    |
//! | 2             | 1s, 4s, 16s, 64s, ...  |
//!
//! The exponent base multiplies the attempt number inside the power of two;
//! it is not the base of the power.

use std::collections::BTreeSet;
use std::time::Duration;

/// Retry configuration for a single request
///
/// Defaults: no retries, no retriable statuses, zero backoff, exponent
/// base 0 (constant backoff).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt
    pub retry_count: u32,
    /// HTTP statuses that trigger a retry; any other status is final
    pub retriable_status_codes: BTreeSet<u16>,
    /// Wait before the first retry
    pub backoff_base: Duration,
    /// Multiplier applied to the attempt number in the exponent
    pub backoff_exponent_base: u32,
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self::default()
    }

    /// Start building a policy
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Total attempts this policy allows (first try plus retries)
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    pub fn is_retriable(&self, status: u16) -> bool {
        self.retriable_status_codes.contains(&status)
    }

    /// Whether the response to 0-based `attempt` should be retried
    pub fn should_retry(&self, attempt: u32, status: u16) -> bool {
        attempt < self.retry_count && self.is_retriable(status)
    }

    /// Wait before retrying after 0-based `attempt`.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = self.backoff_exponent_base.saturating_mul(attempt);
        let multiplier = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(multiplier)
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    pub fn retries(mut self, count: u32) -> Self {
        self.policy.retry_count = count;
        self
    }

    pub fn retry_on<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.policy.retriable_status_codes.extend(statuses);
        self
    }

    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.policy.backoff_base = base;
        self
    }

    pub fn backoff_exponent_base(mut self, exponent_base: u32) -> Self {
        self.policy.backoff_exponent_base = exponent_base;
        self
    }

    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}
