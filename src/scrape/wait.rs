//! Bounded polling for readiness signals.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::Result;

/// How a bounded wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The check reported ready before the ceiling.
    Ready,
    /// The ceiling elapsed first; the caller proceeds with whatever rendered.
    TimedOut,
}

impl WaitOutcome {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// Run `check` every `interval` until it returns `true` or `ceiling` elapses.
///
/// The check always runs at least once, so a zero ceiling degrades to a single
/// check. Errors from `check` abort the wait.
pub async fn poll_until<F, Fut>(ceiling: Duration, interval: Duration, mut check: F) -> Result<WaitOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + ceiling;
    loop {
        if check().await? {
            return Ok(WaitOutcome::Ready);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(WaitOutcome::TimedOut);
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}
