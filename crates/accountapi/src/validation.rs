//! Local validation for account operations
//!
//! Everything here runs before any network call, so a rejected input never
//! costs a round trip. Failures are [`Error::Validation`].
//!
//! # Examples
//!
//! ```rust
//! use accountapi::types::Account;
//! use accountapi::validation::validate_account;
//!
//! let mut account = Account::new("ad27e265-9605-4b4b-a0e5-3003ea9cc4dc", "org", "GB");
//! account.account_type.clear();
//!
//! validate_account(&mut account)?;
//! assert_eq!(account.account_type, "accounts");
//! # Ok::<(), accountapi::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{ACCOUNT_LIST_FILTERS, ACCOUNT_TYPE, Account};
use tracing::debug;

/// Largest page the list endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Validate an account before it is sent, defaulting an empty type.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the id, organisation id or country is
/// empty, or when the type is anything other than `"accounts"`.
pub fn validate_account(account: &mut Account) -> Result<()> {
    validate_id(&account.id)?;

    if account.organisation_id.is_empty() {
        return Err(invalid("organisation_id", "can not be empty"));
    }

    if account.account_type.is_empty() {
        account.account_type = ACCOUNT_TYPE.to_string();
    } else if account.account_type != ACCOUNT_TYPE {
        return Err(invalid(
            "type",
            &format!(
                "should be one of [{}], got {:?}",
                ACCOUNT_TYPE, account.account_type
            ),
        ));
    }

    if account.attributes.country.is_empty() {
        return Err(invalid("attributes.country", "can not be empty"));
    }

    debug!(id = %account.id, "Account validation passed");
    Ok(())
}

/// Validate a resource id used in a path.
///
/// `.` and `..` are rejected: URL path normalisation would drop them and the
/// request would hit the collection instead of the resource.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(invalid("id", "can not be empty"));
    }
    if id == "." || id == ".." {
        return Err(invalid("id", &format!("{:?} is not a valid path segment", id)));
    }
    Ok(())
}

/// Reject any filter key the list endpoint does not support.
pub fn validate_filters<'a, I>(keys: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for key in keys {
        if !ACCOUNT_LIST_FILTERS.iter().any(|allowed| *allowed == key) {
            return Err(invalid(
                "filter",
                &format!(
                    "unsupported filter {:?}, expected one of {:?}",
                    key, ACCOUNT_LIST_FILTERS
                ),
            ));
        }
    }
    Ok(())
}

/// Clamp a page size into `1..=1000`.
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

fn invalid(field: &str, reason: &str) -> Error {
    debug!(field = %field, reason = %reason, "Request validation failed");
    Error::Validation(format!("{} {}", field, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_empty_type_defaults_to_accounts() {
        let mut account = Account::new("id", "org", "GB");
        account.account_type = String::new();
        validate_account(&mut account).unwrap();
        assert_eq!(account.account_type, "accounts");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut account = Account::new("id", "org", "GB");
        account.account_type = "payments".into();
        let err = validate_account(&mut account).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("type"));
    }

    #[rstest]
    #[case("", "org", "GB", "id")]
    #[case("id", "", "GB", "organisation_id")]
    #[case("id", "org", "", "attributes.country")]
    fn test_required_fields(
        #[case] id: &str,
        #[case] org: &str,
        #[case] country: &str,
        #[case] field: &str,
    ) {
        let mut account = Account::new(id, org, country);
        let err = validate_account(&mut account).unwrap_err();
        assert!(err.to_string().contains(field), "{err}");
    }

    #[rstest]
    #[case("", false)]
    #[case(".", false)]
    #[case("..", false)]
    #[case("...", true)]
    #[case("a.b", true)]
    #[case("ad27e265-9605-4b4b-a0e5-3003ea9cc4dc", true)]
    fn test_validate_id(#[case] id: &str, #[case] valid: bool) {
        let result = validate_id(id);
        assert_eq!(result.is_ok(), valid, "{id:?}: {result:?}");
        if let Err(err) = result {
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[test]
    fn test_filters() {
        assert!(validate_filters(["country", "iban", "bank_id_code"]).is_ok());
        assert!(validate_filters(std::iter::empty()).is_ok());

        let err = validate_filters(["country", "name"]).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(100, 100)]
    #[case(1000, 1000)]
    #[case(5000, 1000)]
    fn test_clamp_page_size(#[case] input: u32, #[case] expected: u32) {
        assert_eq!(clamp_page_size(input), expected);
    }
}
