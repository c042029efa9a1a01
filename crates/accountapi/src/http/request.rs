//! JSON:API request construction and response decoding

use super::MEDIA_TYPE;
use crate::error::{Error, Result};
use accountapi_transport::{HttpRequest, HttpResponse};
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Build a request carrying the JSON:API headers and, optionally, a body.
///
/// `Accept` is always set; `Content-Type` only when there is a payload.
pub fn json_request<T>(method: Method, target: &str, payload: Option<&T>) -> Result<HttpRequest>
where
    T: Serialize + ?Sized,
{
    let request = HttpRequest::new(method, target).with_header("Accept", MEDIA_TYPE);

    match payload {
        Some(payload) => {
            let body = serde_json::to_vec(payload)
                .map_err(|e| Error::Validation(format!("request body: {}", e)))?;
            Ok(request
                .with_header("Content-Type", MEDIA_TYPE)
                .with_body(body))
        }
        None => Ok(request),
    }
}

/// A successful response whose content type has been checked.
///
/// The body is decoded lazily so the calling operation picks the envelope.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: bytes::Bytes,
}

impl JsonResponse {
    /// Accept a 2xx response if it declares the JSON:API media type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the `Content-Type` is missing or is
    /// anything other than `application/vnd.api+json` (parameters ignored).
    pub fn from_response(response: HttpResponse) -> Result<Self> {
        match response.media_type() {
            Some(media_type) if media_type == MEDIA_TYPE => Ok(Self {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Some(other) => Err(Error::Decode(format!(
                "unexpected content type {:?}, expected {:?}",
                other, MEDIA_TYPE
            ))),
            None => Err(Error::Decode(format!(
                "missing content type, expected {:?}",
                MEDIA_TYPE
            ))),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers, names lowercased.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
