//! Retry plan value object.

use super::pacer::Pacer;
use std::time::Duration;

/// How many times a logical request is attempted, how far apart the attempts
/// start, and how long each attempt may take.
///
/// A plan is built once from configuration and never mutated afterwards;
/// every request gets a fresh [`Pacer`] from [`RetryPlan::pacer`].
///
/// # Default Configuration
///
/// - `max_attempts`: 2
/// - `backoff`: 3s (measured from the start of the previous attempt)
/// - `timeout`: 5s per attempt
///
/// # Examples
///
/// ```rust
/// use accountapi_core::retry::RetryPlan;
/// use std::time::Duration;
///
/// let plan = RetryPlan::builder()
///     .max_attempts(5)
///     .backoff(Duration::from_millis(250))
///     .timeout(Duration::from_secs(2))
///     .build();
///
/// assert_eq!(plan.max_attempts(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPlan {
    max_attempts: u32,
    backoff: Duration,
    timeout: Duration,
}

impl RetryPlan {
    /// Default number of attempts per logical request.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

    /// Default spacing between attempt starts.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a plan. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff: Duration, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            timeout,
        }
    }

    /// Create a new builder starting from the defaults.
    pub fn builder() -> RetryPlanBuilder {
        RetryPlanBuilder::default()
    }

    /// Maximum number of attempts, always at least one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Minimum spacing between the starts of two attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Upper bound for a single attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A fresh pacer for one logical request.
    pub fn pacer(&self) -> Pacer {
        Pacer::new(self.backoff)
    }
}

impl Default for RetryPlan {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Self::DEFAULT_BACKOFF,
            Self::DEFAULT_TIMEOUT,
        )
    }
}

/// Builder for [`RetryPlan`].
#[derive(Debug, Default)]
pub struct RetryPlanBuilder {
    max_attempts: Option<u32>,
    backoff: Option<Duration>,
    timeout: Option<Duration>,
}

impl RetryPlanBuilder {
    /// Set the maximum number of attempts (values below one become one).
    ///
    /// Default: 2
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the spacing between attempt starts.
    ///
    /// Default: 3s
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Set the per-attempt timeout.
    ///
    /// Default: 5s
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the plan.
    pub fn build(self) -> RetryPlan {
        RetryPlan::new(
            self.max_attempts.unwrap_or(RetryPlan::DEFAULT_MAX_ATTEMPTS),
            self.backoff.unwrap_or(RetryPlan::DEFAULT_BACKOFF),
            self.timeout.unwrap_or(RetryPlan::DEFAULT_TIMEOUT),
        )
    }
}
