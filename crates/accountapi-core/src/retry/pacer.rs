//! Start-anchored pacing between successive operations.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum interval between the start times of successive
/// operations.
///
/// The wait before operation `N + 1` is `max(0, interval - elapsed)` where
/// `elapsed` is measured from the moment operation `N` *started*. An
/// operation that took longer than the interval is followed immediately by
/// the next one.
///
/// The same pacer drives the retry loop of the transport (between attempts of
/// one request) and the paginated stream (between page fetches).
///
/// # Examples
///
/// ```rust
/// use accountapi_core::retry::Pacer;
/// use std::time::Duration;
///
/// # async fn example() {
/// let mut pacer = Pacer::new(Duration::from_millis(50));
/// assert_eq!(pacer.pace().await, Duration::ZERO);
/// // Blocks for roughly 50ms minus whatever the first operation took.
/// pacer.pace().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl Pacer {
    /// Create a pacer that has not started any operation yet.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
        }
    }

    /// The configured minimum interval between operation starts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time still to wait before the next operation may start.
    ///
    /// Zero before the first operation.
    pub fn remaining(&self) -> Duration {
        match self.last_start {
            Some(start) => remaining_backoff(self.interval, start.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Wait until the next operation may start, then record its start.
    ///
    /// Returns how long this call slept. Dropping the returned future before
    /// it completes leaves the recorded start untouched.
    pub async fn pace(&mut self) -> Duration {
        let wait = self.remaining();
        if !wait.is_zero() {
            #[cfg(feature = "tracing")]
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Pacing before next operation");
            tokio::time::sleep(wait).await;
        }
        self.last_start = Some(Instant::now());
        wait
    }
}

/// Remaining backoff given the time elapsed since the previous start.
///
/// Saturates at zero: a slow operation never produces a negative wait.
pub fn remaining_backoff(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
