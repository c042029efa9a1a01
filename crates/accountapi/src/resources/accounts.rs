//! Accounts API endpoint

use std::collections::BTreeMap;

use accountapi_transport::HttpRequest;
use http::Method;
use tracing::{debug, instrument, warn};

use super::Resource;
use crate::{
    client::Client,
    error::{Error, Result},
    http::MEDIA_TYPE,
    streaming::{self, AccountStream, StreamOptions},
    types::{Account, AccountDetails, DataEnvelope},
    validation::{validate_account, validate_filters, validate_id},
};

/// Path of the accounts collection, relative to the API root.
pub const ACCOUNTS_PATH: &str = "v1/organisation/accounts";

/// Accounts API resource.
#[derive(Clone, Debug)]
pub struct Accounts {
    client: Client,
}

impl Accounts {
    /// Create a new Accounts resource.
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create an account, converging on one resource when creation is retried.
    ///
    /// 1. The account is validated locally; an empty type becomes `"accounts"`.
    /// 2. If an account with the same id already exists,
    ///    [`Error::AlreadyExists`] carries it.
    /// 3. If the pre-check answers 404 or 410, the account is posted. A 409
    ///    answer means an earlier attempt (or another client) created it
    ///    first, so the stored account is fetched and returned as success.
    ///
    /// A concurrent creator of the same id is indistinguishable from our own
    /// masked success in step 3.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] before any request, [`Error::AlreadyExists`] when
    /// the pre-check finds the id, and any transport or status error of the
    /// requests involved.
    #[instrument(skip_all, fields(id = %account.id))]
    pub async fn create(&self, mut account: Account) -> Result<Account> {
        validate_account(&mut account)?;

        match self.fetch(&account.id).await {
            Ok(existing) => {
                debug!("Account already exists");
                return Err(Error::AlreadyExists {
                    account: Box::new(existing),
                });
            }
            Err(err) if err.is_missing() => {}
            Err(err) => return Err(err),
        }

        let url = self.client.endpoint(ACCOUNTS_PATH, None)?;
        let created = self
            .client
            .json_request(Method::POST, url.as_str(), Some(&DataEnvelope { data: &account }))
            .await
            .and_then(|response| response.decode::<AccountDetails>());

        match created {
            Ok(details) => {
                debug!(version = details.data.version, "Account created");
                Ok(details.data)
            }
            Err(err) if err.is_conflict() => {
                warn!(
                    error = %err,
                    "Create returned conflict after a missing pre-check, fetching stored account"
                );
                self.fetch(&account.id).await
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch an account by id.
    ///
    /// A missing account is an [`Error::HttpStatus`] with code 404.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: &str) -> Result<Account> {
        validate_id(id)?;

        let url = self.client.endpoint(ACCOUNTS_PATH, Some(id))?;
        let details: AccountDetails = self
            .client
            .json_request::<()>(Method::GET, url.as_str(), None)
            .await?
            .decode()?;

        Ok(details.data)
    }

    /// Update an account, returning the stored result.
    #[instrument(skip(self, account))]
    pub async fn update(&self, id: &str, mut account: Account) -> Result<Account> {
        validate_id(id)?;
        validate_account(&mut account)?;

        let url = self.client.endpoint(ACCOUNTS_PATH, Some(id))?;
        let details: AccountDetails = self
            .client
            .json_request(Method::PATCH, url.as_str(), Some(&DataEnvelope { data: &account }))
            .await?
            .decode()?;

        Ok(details.data)
    }

    /// Delete a specific version of an account.
    ///
    /// Succeeds only on `204 No Content`. A stale version or a repeated
    /// delete surfaces as an [`Error::HttpStatus`].
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str, version: u64) -> Result<()> {
        validate_id(id)?;

        let mut url = self.client.endpoint(ACCOUNTS_PATH, Some(id))?;
        url.query_pairs_mut()
            .append_pair("version", &version.to_string());

        let request =
            HttpRequest::new(Method::DELETE, url.as_str()).with_header("Accept", MEDIA_TYPE);
        let response = self.client.send(request).await?;

        if response.status == 204 {
            debug!("Account deleted");
            return Ok(());
        }

        Err(Error::HttpStatus {
            status: response.status,
            message: format!(
                "Failed to delete account {} received status {}",
                id,
                response.status_line()
            ),
            error_code: None,
        })
    }

    /// List accounts matching `filters` as a stream.
    ///
    /// Filter keys must be among
    /// [`ACCOUNT_LIST_FILTERS`](crate::types::ACCOUNT_LIST_FILTERS); anything
    /// else is rejected before a request is made. Pages are fetched in the
    /// background as the stream is consumed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(client: accountapi::Client) -> accountapi::Result<()> {
    /// let accounts = client
    ///     .accounts()
    ///     .list([("country", "GB"), ("bank_id_code", "GBDSC")])
    ///     .await?
    ///     .collect_all()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all)]
    pub async fn list<I, K, V>(&self, filters: I) -> Result<AccountStream>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let filters: BTreeMap<String, String> = filters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        validate_filters(filters.keys().map(String::as_str))?;

        let config = self.client.config();
        let page_size = config.effective_page_size();

        let mut url = self.client.endpoint(ACCOUNTS_PATH, None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page[size]", &page_size.to_string());
            for (key, value) in &filters {
                query.append_pair(&format!("filter[{}]", key), value);
            }
        }

        debug!(page_size, filters = filters.len(), "Listing accounts");

        streaming::spawn(
            self.client.clone(),
            url.to_string(),
            StreamOptions {
                capacity: page_size as usize,
                wait_for_first_page: config.wait_for_first_page,
            },
        )
        .await
    }

    /// List every account.
    pub async fn list_all(&self) -> Result<AccountStream> {
        self.list(std::iter::empty::<(String, String)>()).await
    }
}

impl Resource for Accounts {
    fn client(&self) -> &Client {
        &self.client
    }
}
