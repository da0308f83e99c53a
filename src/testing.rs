//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use url::Url;

use crate::cache::{MemoryCacheStorage, NamespaceSet};
use crate::error::{Result, WorkerError};
use crate::manifest::StaticAssetManifest;
use crate::net::{cache_key, FetchRequest, FetchResponse, Fetcher, ResponseType};

pub const ORIGIN: &str = "http://localhost:8080";

pub fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

pub fn url(path: &str) -> String {
    origin().join(path).unwrap().to_string()
}

pub fn namespaces() -> NamespaceSet {
    NamespaceSet::new("quantivision", "v1.0.0")
}

pub fn manifest(locators: &[&str]) -> Arc<StaticAssetManifest> {
    Arc::new(StaticAssetManifest::resolve(&origin(), locators).unwrap())
}

pub fn storage() -> Arc<MemoryCacheStorage> {
    Arc::new(MemoryCacheStorage::default())
}

/// Fetcher answering from a fixed route table.
///
/// Unknown URLs get a 404; when offline every fetch fails.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, FetchResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 at `url`, typed by origin.
    pub fn with_page(self, url: &str, body: &str) -> Self {
        let parsed = Url::parse(url).unwrap();
        let response_type = if parsed.origin() == origin().origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        };
        let response =
            FetchResponse::new(StatusCode::OK, body.to_string()).with_type(response_type);
        self.with_response(url, response)
    }

    pub fn with_response(self, url: &str, response: FetchResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(cache_key(&Url::parse(url).unwrap()), response);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkerError::Network("connection refused".to_string()));
        }
        let routes = self.routes.lock().unwrap();
        Ok(routes
            .get(&request.cache_key())
            .cloned()
            .unwrap_or_else(|| FetchResponse::new(StatusCode::NOT_FOUND, "Not Found")))
    }
}
