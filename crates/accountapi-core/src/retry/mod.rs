//! Retry plans and start-anchored pacing.
//!
//! # Key Types
//!
//! - [`RetryPlan`] - attempt budget, backoff and per-attempt timeout
//! - [`Pacer`] - enforces a minimum spacing between the *starts* of
//!   successive operations
//!
//! # Examples
//!
//! ```rust
//! use accountapi_core::retry::Pacer;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let mut pacer = Pacer::new(Duration::from_millis(400));
//!
//! // First call returns immediately, later calls wait out the rest of the
//! // interval counted from the previous start.
//! pacer.pace().await;
//! pacer.pace().await;
//! # }
//! ```

mod pacer;
mod plan;

pub use pacer::{Pacer, remaining_backoff};
pub use plan::{RetryPlan, RetryPlanBuilder};
