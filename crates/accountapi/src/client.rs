//! Main client implementation for the Account API

use std::sync::Arc;
use std::time::Duration;

use accountapi_transport::http::{HttpTransportConfig, RetryPolicy, parse_base_url};
use accountapi_transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
use serde::Serialize;
use url::Url;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    http::{JsonResponse, json_request},
    resources::Accounts,
};

/// Main client for interacting with the Account API.
///
/// Cloning is cheap: configuration and the connection pool are shared.
///
/// # Example
///
/// ```rust,no_run
/// use accountapi::Client;
///
/// # async fn example() -> accountapi::Result<()> {
/// let client = Client::new("http://localhost:8080")?;
/// let account = client.accounts().fetch("ad27e265-9605-4b4b-a0e5-3003ea9cc4dc").await?;
/// println!("{}", account.attributes.country);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// Executes requests, including retries
    transport: Arc<dyn Transport>,

    /// Normalized base URL, ends with `/`
    base_url: Url,

    config: ClientConfig,
}

impl Client {
    /// Create a client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the base URL is unusable.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client configured from `ACCOUNTAPI_*` environment variables.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let transport = HttpTransport::with_config(HttpTransportConfig {
            base_url: config.base_url.clone(),
            connect_timeout: config.connection_pool.connect_timeout,
            pool_max_idle_per_host: config.connection_pool.max_idle_per_host,
            retry_policy: RetryPolicy::new(config.retry_plan()),
        })?;

        Self::from_transport(Arc::new(transport), config)
    }

    /// Create a client on top of a custom transport.
    ///
    /// Relative targets handed to the transport are paths under the
    /// configured base URL; the transport is expected to resolve them.
    pub fn from_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)
            .map_err(|e| Error::Validation(format!("base_url {}", e)))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                config,
            }),
        })
    }

    /// Access the Accounts API endpoint.
    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.clone())
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL of a collection, or of one resource in it when `id` is given.
    ///
    /// The id is appended as a single percent-encoded path segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an id that is not a usable path
    /// segment (empty, `.` or `..`).
    pub fn endpoint(&self, collection: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self
            .inner
            .base_url
            .join(collection)
            .map_err(|e| Error::Validation(format!("path {:?}: {}", collection, e)))?;

        if let Some(id) = id {
            crate::validation::validate_id(id)?;
            url.path_segments_mut()
                .map_err(|_| Error::Validation(format!("cannot append id to {:?}", collection)))?
                .pop_if_empty()
                .push(id);
        }
        Ok(url)
    }

    /// Send a JSON:API request and check the response content type.
    ///
    /// Transport and status errors propagate without decoding.
    pub async fn json_request<T>(
        &self,
        method: http::Method,
        target: &str,
        payload: Option<&T>,
    ) -> Result<JsonResponse>
    where
        T: Serialize + ?Sized,
    {
        let request = json_request(method, target, payload)?;
        let response = self.send(request).await?;
        JsonResponse::from_response(response)
    }

    /// Send a raw request through the transport.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.inner.transport.send_http(request).await?)
    }

    pub(crate) fn page_backoff(&self) -> Duration {
        self.inner.config.page_backoff
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a configured Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of attempts per logical request.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries.max(1);
        self
    }

    /// Set the spacing between attempt starts.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.retry_backoff = backoff;
        self
    }

    /// Set the spacing between page fetch starts.
    pub fn page_backoff(mut self, backoff: Duration) -> Self {
        self.config.page_backoff = backoff;
        self
    }

    /// Set the page size, clamped to `1..=1000`.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = crate::validation::clamp_page_size(page_size);
        self
    }

    /// Make `list` wait for the first page before returning.
    pub fn wait_for_first_page(mut self, wait: bool) -> Self {
        self.config.wait_for_first_page = wait;
        self
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_pool.connect_timeout = timeout;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::accounts::ACCOUNTS_PATH;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .base_url("http://localhost:8080")
            .timeout(Duration::from_secs(30))
            .retries(3)
            .page_size(0)
            .build()
            .unwrap();

        assert_eq!(client.config().retries, 3);
        assert_eq!(client.config().page_size, 1);
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Client::new("::not a url::").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_endpoint_paths() {
        let client = Client::new("http://localhost:8080/api").unwrap();

        let collection = client.endpoint(ACCOUNTS_PATH, None).unwrap();
        assert_eq!(
            collection.as_str(),
            "http://localhost:8080/api/v1/organisation/accounts"
        );

        let one = client.endpoint(ACCOUNTS_PATH, Some("a b/c")).unwrap();
        assert_eq!(
            one.as_str(),
            "http://localhost:8080/api/v1/organisation/accounts/a%20b%2Fc"
        );
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let client = Client::new("http://localhost:8080").unwrap();

        for id in [".", ".."] {
            let err = client.endpoint(ACCOUNTS_PATH, Some(id)).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{id:?}: {err:?}");
        }
    }

    #[test]
    fn test_client_clone_shares_config() {
        let client1 = Client::new("http://localhost:8080").unwrap();
        let client2 = client1.clone();
        assert!(Arc::ptr_eq(&client1.inner, &client2.inner));
    }
}
