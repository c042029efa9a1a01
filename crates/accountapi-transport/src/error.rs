//! Transport error types

use crate::traits::HttpResponse;
use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Clone)]
pub enum TransportError {
    /// The request could not be built (unparseable URL, bad header).
    /// Retrying cannot fix it.
    InvalidRequest(String),

    /// Connection error
    Connection(String),

    /// The attempt exceeded its timeout
    Timeout,

    /// The HTTP client failed after the request was handed over
    Http(String),

    /// The server answered with a status outside 200..300.
    ///
    /// Carries the full final response so the caller can derive a message
    /// from a structured error body.
    Status(HttpResponse),

    /// Serialization error
    Serialization(String),
}

impl TransportError {
    /// Status code of the final response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status),
            _ => None,
        }
    }

    /// The final non-2xx response, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Timeout => write!(f, "Timeout"),
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
            Self::Status(response) => write!(
                f,
                "Received unexpected HTTP status code {}",
                response.status_line()
            ),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    #[test]
    fn test_status_display_uses_status_line() {
        let err = TransportError::Status(HttpResponse::new(404, HashMap::new(), Bytes::new()));
        assert_eq!(
            err.to_string(),
            "Received unexpected HTTP status code 404 Not Found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_non_status_errors_have_no_status() {
        assert_eq!(TransportError::Timeout.status(), None);
        assert!(TransportError::Connection("refused".into()).response().is_none());
    }

    #[test]
    fn test_url_parse_error_is_invalid_request() {
        let err: TransportError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }
}
