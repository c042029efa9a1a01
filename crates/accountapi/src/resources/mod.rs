//! API resource endpoints

pub mod accounts;

pub use accounts::Accounts;

use crate::client::Client;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &Client;
}
