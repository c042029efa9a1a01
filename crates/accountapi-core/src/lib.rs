#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the accountapi crates.
//!
//! This crate holds the timing primitives that the transport and the
//! paginated stream share:
//!
//! - **Retry plans** via [`RetryPlan`](retry::RetryPlan): attempt budget,
//!   backoff and per-attempt timeout, fixed at client construction
//! - **Start-anchored pacing** via [`Pacer`](retry::Pacer): the wait between
//!   two operations is measured from the *start* of the previous one, so a
//!   slow request absorbs part of the wait
//!
//! # Examples
//!
//! ```rust
//! use accountapi_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let plan = RetryPlan::builder()
//!     .max_attempts(3)
//!     .backoff(Duration::from_millis(100))
//!     .build();
//!
//! let mut pacer = plan.pacer();
//! for _attempt in 0..plan.max_attempts() {
//!     pacer.pace().await;
//!     // issue the request here
//! }
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use accountapi_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{Pacer, RetryPlan, RetryPlanBuilder};
}
