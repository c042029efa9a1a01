//! Retry policy for HTTP transport
//!
//! Wraps the [`RetryPlan`] from `accountapi-core` with the HTTP-specific
//! decision of which failures are worth another attempt.

use crate::error::TransportError;
use std::time::Duration;
pub use accountapi_core::retry::{Pacer, RetryPlan, RetryPlanBuilder};

/// Status codes that indicate a request-shape problem no retry can fix.
///
/// 409 is deliberately terminal so callers can apply compensating logic
/// (see the create coordinator in the `accountapi` crate).
pub const TERMINAL_STATUSES: [u16; 12] = [
    400, // Bad Request
    401, // Unauthorized
    403, // Forbidden
    404, // Not Found
    405, // Method Not Allowed
    406, // Not Acceptable
    407, // Proxy Authentication Required
    409, // Conflict
    410, // Gone
    414, // URI Too Long
    418, // I'm a teapot
    431, // Request Header Fields Too Large
];

/// HTTP retry policy: a [`RetryPlan`] plus status classification.
///
/// # Default Configuration
///
/// - `max_attempts`: 2
/// - `backoff`: 3s between attempt starts
/// - `timeout`: 5s per attempt
///
/// # Examples
///
/// ```rust
/// use accountapi_transport::http::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .backoff(Duration::from_millis(100))
///     .build();
///
/// assert_eq!(policy.max_attempts(), 5);
/// assert!(RetryPolicy::is_terminal_status(404));
/// assert!(!RetryPolicy::is_terminal_status(503));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    plan: RetryPlan,
}

impl RetryPolicy {
    /// Wrap an existing plan.
    pub fn new(plan: RetryPlan) -> Self {
        Self { plan }
    }

    /// Create a new builder for configuring the HTTP retry policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder {
            inner: RetryPlan::builder(),
        }
    }

    /// Whether a non-2xx status ends the retry loop immediately.
    pub fn is_terminal_status(status: u16) -> bool {
        TERMINAL_STATUSES.contains(&status)
    }

    /// Check if a transport error should be retried.
    ///
    /// Retryable:
    /// - Timeout, connection and in-flight HTTP failures
    /// - Non-2xx statuses outside [`TERMINAL_STATUSES`] (5xx, 429, ...)
    ///
    /// Not retryable:
    /// - Requests that could not be built
    /// - Serialization errors (will fail again)
    /// - Terminal statuses
    pub fn is_retryable(error: &TransportError) -> bool {
        match error {
            TransportError::Timeout => true,
            TransportError::Connection(_) => true,
            TransportError::Http(_) => true,
            TransportError::Status(response) => !Self::is_terminal_status(response.status),
            TransportError::InvalidRequest(_) => false,
            TransportError::Serialization(_) => false,
        }
    }

    /// The underlying plan.
    pub fn plan(&self) -> &RetryPlan {
        &self.plan
    }

    /// Maximum number of attempts per logical request.
    pub fn max_attempts(&self) -> u32 {
        self.plan.max_attempts()
    }

    /// Minimum spacing between attempt starts.
    pub fn backoff(&self) -> Duration {
        self.plan.backoff()
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.plan.timeout()
    }

    /// A fresh pacer for one logical request.
    pub fn pacer(&self) -> Pacer {
        self.plan.pacer()
    }
}

impl From<RetryPlan> for RetryPolicy {
    fn from(plan: RetryPlan) -> Self {
        Self::new(plan)
    }
}

/// Builder for HTTP retry policies.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    inner: RetryPlanBuilder,
}

impl RetryPolicyBuilder {
    /// Set the maximum number of attempts.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.inner = self.inner.max_attempts(max_attempts);
        self
    }

    /// Set the spacing between attempt starts.
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.inner = self.inner.backoff(backoff);
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the retry policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            plan: self.inner.build(),
        }
    }
}
