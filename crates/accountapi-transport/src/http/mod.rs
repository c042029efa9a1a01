//! HTTP transport implementation
//!
//! Provides an HTTP client that implements the Transport trait.
//! Handles retries, pacing, timeouts and base URL resolution.

pub mod client;
pub mod retry;

pub use client::{DEFAULT_BASE_URL, HttpTransport, HttpTransportConfig, parse_base_url};
pub use retry::{RetryPolicy, RetryPolicyBuilder, TERMINAL_STATUSES};
