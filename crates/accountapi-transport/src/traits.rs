//! Transport trait and the plain-data request/response types it exchanges.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use std::collections::HashMap;

/// An HTTP request to be sent by a transport
///
/// The target is either an absolute URL or a path that the transport resolves
/// against its base URL. The body is held as [`Bytes`] so every retry attempt
/// can re-send it without copying.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,

    /// Absolute URL or path relative to the base URL
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response
///
/// The body is read in full before the response is handed out.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Canonical reason phrase for the status, if the code is known.
    pub fn reason(&self) -> Option<&'static str> {
        http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
    }

    /// Status code and reason phrase, e.g. `404 Not Found`.
    pub fn status_line(&self) -> String {
        match self.reason() {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }

    /// Get the response body as a string
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type of the body without parameters, lowercased.
    ///
    /// `application/vnd.api+json; charset=utf-8` yields
    /// `application/vnd.api+json`.
    pub fn media_type(&self) -> Option<String> {
        self.get_header("content-type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Executes one logical HTTP request, including any retries.
///
/// The seam between the client and the network. `HttpTransport` is the
/// production implementation; tests can substitute their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive the final response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`](crate::TransportError::Status) when
    /// the final response is not 2xx, or the last transport failure when no
    /// attempt produced a response.
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse>;
}
