//! Wire envelopes around account payloads

use super::Account;
use serde::{Deserialize, Deserializer, Serialize};

/// Request body for create and update: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<'a> {
    /// The account being sent
    pub data: &'a Account,
}

/// Single-account response to fetch, create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountDetails {
    /// The account
    pub data: Account,

    /// Self link and friends
    #[serde(default)]
    pub links: Option<Links>,
}

/// One page of a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountPage {
    /// Accounts on this page, in server order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Account>,

    /// Cursors to neighbouring pages
    #[serde(default)]
    pub links: Option<Links>,
}

impl AccountPage {
    /// Target of the next page, when there is one.
    pub fn next_page(&self) -> Option<&str> {
        self.links.as_ref().and_then(Links::next_page)
    }
}

/// Page cursors. Only `next` drives pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// First page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    /// Last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,

    /// Next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    /// This page
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

impl Links {
    /// `next`, if present and non-empty.
    pub fn next_page(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}

/// Error body returned by the API on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    /// Human readable description
    #[serde(default)]
    pub error_message: String,

    /// Machine readable code
    #[serde(default)]
    pub error_code: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Account>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Account>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_with_next_link() {
        let page: AccountPage = serde_json::from_value(json!({
            "data": [
                { "id": "a", "organisation_id": "o", "attributes": { "country": "GB" } }
            ],
            "links": {
                "first": "/v1/organisation/accounts?page%5Bnumber%5D=first",
                "next": "/v1/organisation/accounts?page%5Bnumber%5D=1",
                "self": "/v1/organisation/accounts"
            }
        }))
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(
            page.next_page(),
            Some("/v1/organisation/accounts?page%5Bnumber%5D=1")
        );
    }

    #[test]
    fn test_empty_or_missing_next_ends_paging() {
        let empty: AccountPage =
            serde_json::from_value(json!({ "data": [], "links": { "next": "" } })).unwrap();
        assert_eq!(empty.next_page(), None);

        let missing: AccountPage = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(missing.data.is_empty());
        assert_eq!(missing.next_page(), None);
    }

    #[test]
    fn test_data_envelope_shape() {
        let account = Account::new("a", "o", "GB");
        let value = serde_json::to_value(DataEnvelope { data: &account }).unwrap();
        assert_eq!(value["data"]["id"], "a");
        assert_eq!(value["data"]["type"], "accounts");
    }
}
