//! Property-based tests for accountapi
//!
//! Random inputs against the local invariants: validation, page size
//! clamping, error mapping and link handling.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use accountapi_transport::{HttpResponse, TransportError};
    use proptest::prelude::*;

    use crate::error::Error;
    use crate::types::{ACCOUNT_LIST_FILTERS, ACCOUNT_TYPE, Account, Links};
    use crate::validation::{MAX_PAGE_SIZE, clamp_page_size, validate_account, validate_filters};

    // ===== Strategy Generators =====

    fn arb_id() -> impl Strategy<Value = String> {
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
    }

    fn arb_country() -> impl Strategy<Value = String> {
        "[A-Z]{2}"
    }

    fn arb_allowed_filter() -> impl Strategy<Value = &'static str> {
        proptest::sample::select(ACCOUNT_LIST_FILTERS)
    }

    fn arb_error_status() -> impl Strategy<Value = u16> {
        400u16..600u16
    }

    // ===== Validation Properties =====

    proptest! {
        /// Accounts with every required field pass and end up typed.
        #[test]
        fn prop_complete_account_is_valid(
            id in arb_id(),
            org in arb_id(),
            country in arb_country(),
            typed in any::<bool>(),
        ) {
            let mut account = Account::new(id, org, country);
            if !typed {
                account.account_type.clear();
            }

            prop_assert!(validate_account(&mut account).is_ok());
            prop_assert_eq!(account.account_type.as_str(), ACCOUNT_TYPE);
        }

        /// Any type other than "accounts" is rejected.
        #[test]
        fn prop_foreign_type_is_rejected(
            id in arb_id(),
            account_type in "[a-z_]{1,16}",
        ) {
            prop_assume!(account_type != ACCOUNT_TYPE);

            let mut account = Account::new(id, "org", "GB");
            account.account_type = account_type;

            let result = validate_account(&mut account);
            prop_assert!(matches!(result, Err(Error::Validation(_))));
        }

        /// Supported filter keys pass in any combination.
        #[test]
        fn prop_supported_filters_pass(
            keys in proptest::collection::vec(arb_allowed_filter(), 0..8),
        ) {
            prop_assert!(validate_filters(keys).is_ok());
        }

        /// One unsupported key fails the whole set.
        #[test]
        fn prop_unsupported_filter_fails(
            keys in proptest::collection::vec(arb_allowed_filter(), 0..4),
            unknown in "[a-z]{1,12}",
            at in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!ACCOUNT_LIST_FILTERS.contains(&unknown.as_str()));

            let mut keys: Vec<&str> = keys;
            let at = at.index(keys.len() + 1);
            keys.insert(at, unknown.as_str());

            prop_assert!(matches!(validate_filters(keys), Err(Error::Validation(_))));
        }

        /// Page sizes always land in the served range.
        #[test]
        fn prop_page_size_clamped(size in any::<u32>()) {
            let clamped = clamp_page_size(size);
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&clamped));
            if (1..=MAX_PAGE_SIZE).contains(&size) {
                prop_assert_eq!(clamped, size);
            }
        }
    }

    // ===== Error Mapping Properties =====

    proptest! {
        /// A structured error body keeps the status and the server's message.
        #[test]
        fn prop_status_body_message_kept(
            status in arb_error_status(),
            message in "[a-zA-Z0-9 ]{1,60}",
        ) {
            let body = serde_json::json!({ "error_message": &message }).to_string();
            let err: Error =
                TransportError::Status(HttpResponse::new(status, HashMap::new(), body)).into();

            prop_assert_eq!(err.code(), status);
            prop_assert_eq!(err.to_string(), message);
            prop_assert_eq!(err.is_not_found(), status == 404);
            prop_assert_eq!(err.is_conflict(), status == 409);
        }

        /// Any body that is not an error document falls back to the status line.
        #[test]
        fn prop_opaque_body_falls_back_to_status_line(
            status in arb_error_status(),
            body in "[a-z<>/ ]{0,40}",
        ) {
            let err: Error =
                TransportError::Status(HttpResponse::new(status, HashMap::new(), body)).into();

            prop_assert_eq!(err.code(), status);
            let expected_prefix = format!("Received unexpected HTTP status code {}", status);
            prop_assert!(err.to_string().starts_with(&expected_prefix));
        }
    }

    // ===== Link Properties =====

    proptest! {
        /// Only a present, non-empty next link continues paging.
        #[test]
        fn prop_next_link_requires_content(next in proptest::option::of("[a-z/?=\\[\\]0-9&]{0,30}")) {
            let links = Links {
                next: next.clone(),
                ..Default::default()
            };

            let expected = next.as_deref().filter(|n| !n.is_empty());
            prop_assert_eq!(links.next_page(), expected);
        }
    }
}
