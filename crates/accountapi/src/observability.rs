//! Structured logging helpers
//!
//! Paginated streams log through [`StreamContext`] so every stream reports
//! its progress with the same fields. With the `trace` feature,
//! [`init_tracing`] installs a `RUST_LOG`-driven subscriber.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::Error;

/// Progress of one paginated stream, for logging.
#[derive(Debug)]
pub struct StreamContext {
    /// Pages fetched so far
    pub page_count: u32,
    /// Items published so far
    pub item_count: u64,
    started: Instant,
}

impl StreamContext {
    /// Start tracking a stream whose first page is `target`.
    pub fn start(target: &str) -> Self {
        debug!(target_url = %target, "Opening account stream");
        Self {
            page_count: 0,
            item_count: 0,
            started: Instant::now(),
        }
    }

    /// Time since the stream started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Record a fetched page.
    pub fn log_page(&mut self, items: usize, has_next: bool) {
        self.page_count += 1;
        debug!(
            page = self.page_count,
            items,
            has_next,
            "Fetched account page"
        );
    }

    /// Record one item handed to the consumer.
    pub fn record_item(&mut self) {
        self.item_count += 1;
    }

    /// Log clean completion.
    pub fn log_complete(&self) {
        info!(
            pages = self.page_count,
            items = self.item_count,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Account stream completed"
        );
    }

    /// Log a consumer-requested stop.
    pub fn log_stopped(&self) {
        debug!(
            pages = self.page_count,
            items = self.item_count,
            "Account stream stopped by consumer"
        );
    }

    /// Log the error that ended the stream.
    pub fn log_error(&self, error: &Error) {
        warn!(
            pages = self.page_count,
            items = self.item_count,
            elapsed_ms = self.elapsed().as_millis() as u64,
            code = error.code(),
            error = %error,
            "Account stream failed"
        );
    }
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when a global subscriber was already set.
#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub fn init_tracing() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
