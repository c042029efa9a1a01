//! Retrying HTTP transport for the accountapi client
//!
//! Provides a trait-based transport abstraction so the account client can be
//! driven by the reqwest-backed [`HttpTransport`] in production and by a
//! substitute in tests.
//!
//! # Architecture
//!
//! - **Transport trait**: one logical request in, one final response out
//! - **HTTP transport**: reqwest client with paced retries
//! - **Error handling**: [`TransportError`] keeps the final non-2xx response

#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! # Usage
//!
//! ```ignore
//! use accountapi_transport::{HttpRequest, HttpTransport, Transport};
//! use http::Method;
//!
//! let transport = HttpTransport::new("http://localhost:8080")?;
//! let request = HttpRequest::new(Method::GET, "v1/organisation/accounts");
//! let response = transport.send_http(request).await?;
//! ```

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig, RetryPolicy};
pub use traits::{HttpRequest, HttpResponse, Transport};
