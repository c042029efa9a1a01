//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of reqwest with start-anchored
//! retry pacing and terminal-status classification.

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub use super::retry::RetryPolicy;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.form3.tech/";

/// HTTP transport implementation
///
/// Handles HTTP requests with:
/// - Up to `max_attempts` attempts per logical request
/// - A minimum spacing between attempt starts
/// - A per-attempt timeout
/// - Connection pooling
///
/// Relative request targets are resolved against the base URL, which always
/// ends in `/` so that `v1/organisation/accounts` lands under its path.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    base_url: Url,
    retry_policy: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport for `base_url` with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] when the URL cannot serve
    /// as a base.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(HttpTransportConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            retry_policy: config.retry_policy,
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Resolve a request target against the base URL.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        Ok(self.base_url.join(target)?)
    }
}

/// Parse and normalize a base URL so it ends with `/`.
///
/// # Errors
///
/// Fails for unparseable input and for URLs such as `mailto:` that cannot
/// carry a path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(TransportError::InvalidRequest(format!(
            "base URL cannot carry a path: {}",
            raw
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.resolve(&request.url)?;
        let max_attempts = self.retry_policy.max_attempts();
        let mut pacer = self.retry_policy.pacer();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            pacer.pace().await;

            let err = match self.try_send_request(&request, &url).await {
                Ok(response) if response.is_success() => {
                    debug!(
                        method = %request.method,
                        url = %url,
                        status = response.status,
                        attempt,
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Ok(response) => TransportError::Status(response),
                Err(err) => err,
            };

            if !RetryPolicy::is_retryable(&err) {
                debug!(
                    method = %request.method,
                    url = %url,
                    attempt,
                    error = %err,
                    "Request failed with non-retryable error"
                );
                return Err(err);
            }

            if attempt < max_attempts {
                warn!(
                    method = %request.method,
                    url = %url,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Request attempt failed, retrying"
                );
            }
            last_error = Some(err);
        }

        let err = last_error.unwrap_or(TransportError::Timeout);
        warn!(
            method = %request.method,
            url = %url,
            max_attempts,
            error = %err,
            "Request failed after exhausting attempts"
        );
        Err(err)
    }
}

impl HttpTransport {
    async fn try_send_request(&self, request: &HttpRequest, url: &Url) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(request.method.clone(), url.clone())
            .timeout(self.retry_policy.timeout());

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Bytes clone is a refcount bump, so every attempt sends the full body.
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Base URL that relative request targets resolve against
    pub base_url: String,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Retry policy, including the per-attempt timeout
    pub retry_policy: RetryPolicy,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            pool_max_idle_per_host: 10,
            retry_policy: RetryPolicy::default(),
        }
    }
}
