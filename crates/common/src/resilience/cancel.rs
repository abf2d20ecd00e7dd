//! Cancellable waits

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The wait was interrupted by cancellation
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("wait cancelled")]
pub struct Cancelled;

/// Sleep for `delay` unless `cancel` fires first.
///
/// Returns immediately with [`Cancelled`] if the token is already cancelled,
/// even for a zero delay.
pub async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            let wait_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            debug!(wait_ms, "wait cancelled");
            Err(Cancelled)
        }
        () = tokio::time::sleep(delay) => Ok(()),
    }
}
