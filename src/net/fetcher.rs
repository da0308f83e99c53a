//! Network Fetcher
//!
//! Abstraction over the network so the worker can be exercised without one.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header;
use tracing::debug;
use url::Url;

use crate::error::{Result, WorkerError};
use crate::net::{FetchRequest, FetchResponse, ResponseType};

/// Issues requests against the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs the request. Connection, DNS and timeout failures are
    /// reported as [`WorkerError::Network`]; any HTTP status is a success.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

// == HTTP Fetcher ==
/// reqwest-backed fetcher.
///
/// Responses whose final URL, after redirects, is on the configured origin
/// are classified as `basic`, everything else as `cors`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests are bounded by `timeout`.
    pub fn new(origin: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkerError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, origin })
    }

    fn classify(&self, url: &Url) -> ResponseType {
        if url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| WorkerError::Network(e.to_string()))?;

        // Redirects are followed, so classify where the body came from
        let response_type = self.classify(response.url());
        let status = response.status();
        let mut headers = response.headers().clone();
        // The body is buffered, so the upstream framing no longer applies
        headers.remove(header::TRANSFER_ENCODING);
        headers.remove(header::CONNECTION);

        let body = response
            .bytes()
            .await
            .map_err(|e| WorkerError::Network(e.to_string()))?;

        debug!("{} {} -> {}", request.method, request.url, status);

        Ok(FetchResponse {
            status,
            headers,
            body,
            response_type,
        })
    }
}
