//! JSON:API request helper
//!
//! Serializes request payloads, sends them through the transport and checks
//! that successful responses carry the JSON:API media type before decoding.

pub use request::{JsonResponse, json_request};

mod request;

/// Media type used for `Accept` and `Content-Type`.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

// Re-export HTTP types from the http crate for convenience
pub use http::{Method, StatusCode};
