//! Account resource types

use serde::{Deserialize, Serialize};

/// The only resource type name the accounts collection accepts.
pub const ACCOUNT_TYPE: &str = "accounts";

/// Filter keys the list endpoint understands.
pub const ACCOUNT_LIST_FILTERS: &[&str] = &[
    "bank_id_code",
    "bank_id",
    "account_number",
    "iban",
    "customer_id",
    "country",
];

/// An account resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Resource id, chosen by the client (usually a UUID)
    pub id: String,

    /// Owning organisation id
    pub organisation_id: String,

    /// Resource type name; empty is sent as `"accounts"`
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub account_type: String,

    /// Server-assigned version counter
    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u64,

    /// Account attributes
    #[serde(default)]
    pub attributes: AccountAttributes,
}

impl Account {
    /// Create an account with the minimum required fields.
    pub fn new(
        id: impl Into<String>,
        organisation_id: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organisation_id: organisation_id.into(),
            account_type: ACCOUNT_TYPE.to_string(),
            version: 0,
            attributes: AccountAttributes::new(country),
        }
    }

    /// Set the attributes.
    pub fn with_attributes(mut self, attributes: AccountAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Attributes of an [`Account`].
///
/// Only `country` is required; every optional field is left off the wire
/// when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    /// ISO 3166-1 alpha-2 country code
    #[serde(default)]
    pub country: String,

    /// Alternative names for the account holder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_bank_account_names: Option<Vec<String>>,

    /// Local bank identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,

    /// Identifies the type of `bank_id` (e.g. `GBDSC`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,

    /// SWIFT BIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,

    /// Account number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    /// IBAN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    /// Customer reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl AccountAttributes {
    /// Attributes with only the country set.
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }

    /// Set the bank id and its code.
    pub fn with_bank_id(mut self, bank_id: impl Into<String>, code: impl Into<String>) -> Self {
        self.bank_id = Some(bank_id.into());
        self.bank_id_code = Some(code.into());
        self
    }

    /// Set the BIC.
    pub fn with_bic(mut self, bic: impl Into<String>) -> Self {
        self.bic = Some(bic.into());
        self
    }

    /// Set the account number.
    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Set the IBAN.
    pub fn with_iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    /// Set the customer id.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Set alternative account holder names.
    pub fn with_alternative_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternative_bank_account_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
