//! Fetch Response Module
//!
//! Responses returned to pages, whether they came from the network, a cache
//! namespace, or were synthesized offline.

use std::fmt;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;

/// Body of the synthesized offline response.
pub const OFFLINE_BODY: &str = "Offline";

// == Response Type ==
/// Origin classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response
    Basic,
    /// Cross-origin response with readable status
    Cors,
    /// Cross-origin response whose status cannot be inspected
    Opaque,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

// == Fetch Response ==
/// A complete response: status, headers and body.
///
/// Cloning is cheap since the body is reference counted, so a response can be
/// handed to the caller and written to a cache at the same time.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Origin classification
    pub response_type: ResponseType,
}

impl FetchResponse {
    /// Creates a same-origin response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            response_type: ResponseType::Basic,
        }
    }

    /// Sets the origin classification.
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Adds a header. Values that are not valid header text are skipped.
    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    // == Offline ==
    /// The response served when neither cache nor network can answer.
    pub fn offline() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, OFFLINE_BODY)
            .with_header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
    }

    /// Reason phrase for the status code.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Only verified same-origin 200 responses are stored by the interceptor.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.response_type == ResponseType::Basic
    }
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
