//! Error types for the Account API client
//!
//! Every failure surfaces as one [`Error`] value. Each variant carries an
//! HTTP-status-like [`code`](Error::code) so control decisions such as "was it
//! a 404?" never depend on message text.

use crate::types::{Account, ApiErrorBody};
use accountapi_transport::TransportError;
use thiserror::Error;

/// Result type alias for operations that can fail with an Account API error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Account API client.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input was rejected locally; no request was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No HTTP response was obtained (connect failure, timeout, or the
    /// request could not be built).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the underlying failure
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Server-provided `error_message`, or a generic status description
        message: String,
        /// Server-provided `error_code`, if any
        error_code: Option<String>,
    },

    /// A 2xx response had the wrong content type or could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Create found an account with the same id already on the server.
    #[error("Account {} already exists", .account.id)]
    AlreadyExists {
        /// The account the server already holds
        account: Box<Account>,
    },
}

impl Error {
    /// Create a transport error from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP-status-like code of this error.
    ///
    /// `0` means no HTTP response was involved (transport failure, local
    /// validation or decoding).
    pub fn code(&self) -> u16 {
        match self {
            Self::HttpStatus { status, .. } => *status,
            Self::AlreadyExists { .. } => 409,
            Self::Validation(_) | Self::Transport { .. } | Self::Decode(_) => 0,
        }
    }

    /// Check if this error indicates the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code() == 404
    }

    /// Check if this error indicates the resource is missing: not found
    /// (404) or gone (410).
    pub fn is_missing(&self) -> bool {
        matches!(self.code(), 404 | 410)
    }

    /// Check if this error indicates a conflict with existing state.
    pub fn is_conflict(&self) -> bool {
        self.code() == 409
    }

    /// The existing account carried by an [`Error::AlreadyExists`].
    pub fn existing_account(&self) -> Option<&Account> {
        match self {
            Self::AlreadyExists { account } => Some(account),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status(response) => {
                let fallback = || TransportError::Status(response.clone()).to_string();
                match response.json::<ApiErrorBody>() {
                    Ok(body) if !body.error_message.is_empty() => Error::HttpStatus {
                        status: response.status,
                        message: body.error_message,
                        error_code: body.error_code.filter(|code| !code.is_empty()),
                    },
                    _ => Error::HttpStatus {
                        status: response.status,
                        message: fallback(),
                        error_code: None,
                    },
                }
            }
            TransportError::Serialization(msg) => Error::Decode(msg),
            other => Error::transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
