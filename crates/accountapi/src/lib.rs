//! # accountapi
//!
//! Async client for the Form3 Account API supporting:
//! - Create, fetch, update and delete of account resources
//! - Paginated listing as a cancellable [`futures::Stream`]
//! - Retries with start-anchored backoff and per-attempt timeouts
//! - Create that converges on one account when retried
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use accountapi::{Account, Client};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://localhost:8080")?;
//!
//!     let account = Account::new(
//!         "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
//!         "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
//!         "GB",
//!     );
//!     let created = client.accounts().create(account).await?;
//!     println!("created version {}", created.version);
//!
//!     let mut stream = client.accounts().list([("country", "GB")]).await?;
//!     while let Some(account) = stream.next().await {
//!         println!("{}", account.id);
//!     }
//!     if let Some(err) = stream.error() {
//!         return Err(err.clone().into());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ConnectionPoolConfig};
pub use error::{Error, Result};
pub use resources::Accounts;
pub use streaming::{AccountStream, StopHandle};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod streaming;
pub mod types;
pub mod validation;

// Re-export the transport layer for custom transports
pub use accountapi_transport as transport;

#[cfg(test)]
mod property_tests;
