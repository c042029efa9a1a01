//! Configuration for the Account API client

use crate::error::{Error, Result};
use crate::validation::clamp_page_size;
use accountapi_core::retry::RetryPlan;
use accountapi_transport::http::{DEFAULT_BASE_URL, parse_base_url};
use std::time::Duration;

/// Configuration for the Account API client.
///
/// Built once at client creation and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API; a trailing `/` is added when missing
    pub base_url: String,

    /// Per-attempt timeout
    pub timeout: Duration,

    /// Attempts per logical request (at least one)
    pub retries: u32,

    /// Minimum spacing between the starts of two attempts
    pub retry_backoff: Duration,

    /// Minimum spacing between the starts of two page fetches
    pub page_backoff: Duration,

    /// Items requested per page, clamped to `1..=1000`
    pub page_size: u32,

    /// Make `list` return only after the first page was fetched
    pub wait_for_first_page: bool,

    /// Connection pool configuration
    pub connection_pool: ConnectionPoolConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: RetryPlan::DEFAULT_TIMEOUT,
            retries: RetryPlan::DEFAULT_MAX_ATTEMPTS,
            retry_backoff: RetryPlan::DEFAULT_BACKOFF,
            page_backoff: Duration::from_millis(400),
            page_size: 100,
            wait_for_first_page: false,
            connection_pool: ConnectionPoolConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first. This will look
    /// for:
    /// - `ACCOUNTAPI_BASE_URL`
    /// - `ACCOUNTAPI_TIMEOUT_MS`
    /// - `ACCOUNTAPI_RETRIES`
    /// - `ACCOUNTAPI_RETRY_BACKOFF_MS`
    /// - `ACCOUNTAPI_PAGE_BACKOFF_MS`
    /// - `ACCOUNTAPI_PAGE_SIZE`
    /// - `ACCOUNTAPI_WAIT_FOR_FIRST_PAGE` (`true`/`false`/`1`/`0`)
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when a variable is set but cannot be
    /// parsed, or when the resulting configuration is invalid.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("ACCOUNTAPI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(ms) = parse_var::<u64>("ACCOUNTAPI_TIMEOUT_MS")? {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_var::<u32>("ACCOUNTAPI_RETRIES")? {
            config.retries = retries.max(1);
        }
        if let Some(ms) = parse_var::<u64>("ACCOUNTAPI_RETRY_BACKOFF_MS")? {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>("ACCOUNTAPI_PAGE_BACKOFF_MS")? {
            config.page_backoff = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<u32>("ACCOUNTAPI_PAGE_SIZE")? {
            config.page_size = clamp_page_size(size);
        }
        if let Ok(flag) = env::var("ACCOUNTAPI_WAIT_FOR_FIRST_PAGE") {
            config.wait_for_first_page = parse_flag("ACCOUNTAPI_WAIT_FOR_FIRST_PAGE", &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration without building a client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unusable base URL or a zero
    /// timeout.
    pub fn validate(&self) -> Result<()> {
        parse_base_url(&self.base_url)
            .map_err(|e| Error::Validation(format!("base_url {}", e)))?;
        if self.timeout.is_zero() {
            return Err(Error::Validation("timeout must be greater than zero".into()));
        }
        Ok(())
    }

    /// The retry plan the transport runs with.
    pub fn retry_plan(&self) -> RetryPlan {
        RetryPlan::new(self.retries, self.retry_backoff, self.timeout)
    }

    /// Page size as sent on the wire.
    pub fn effective_page_size(&self) -> u32 {
        clamp_page_size(self.page_size)
    }
}

/// Configuration for HTTP connection pooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPoolConfig {
    /// Maximum number of idle connections per host
    pub max_idle_per_host: usize,

    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(feature = "env")]
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Validation(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(feature = "env")]
fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Validation(format!(
            "{} has an invalid value: {:?}",
            name, raw
        ))),
    }
}
