//! Resilience primitives
//!
//! - [`RetryPolicy`]: caller-specified retry count, retriable statuses and
//!   exponential backoff (`base * 2^(exponent_base * attempt)`)
//! - [`sleep_or_cancel`]: a backoff wait that aborts when the ambient
//!   cancellation token fires
//! - [`Clock`]: time abstraction, testable with [`MockClock`]

pub mod backoff;
pub mod cancel;
pub mod clock;

pub use backoff::{RetryPolicy, RetryPolicyBuilder};
pub use cancel::{sleep_or_cancel, Cancelled};
pub use clock::{Clock, MockClock, SystemClock};
