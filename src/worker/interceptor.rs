//! Request Interceptor
//!
//! Cache-first with network fallback. Cached entries are served verbatim with
//! no revalidation, trading freshness for guaranteed offline availability.

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheEntry, CacheRole, CacheStorage, InterceptStats, NamespaceSet};
use crate::manifest::StaticAssetManifest;
use crate::net::{FetchRequest, FetchResponse, Fetcher};
use crate::tasks::spawn_cache_write;

// == Intercept Decision ==
/// How a single request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterceptDecision {
    /// Served from a cache namespace
    ServeCached,
    /// Fetched, and written to the dynamic namespace
    FetchThenCacheDynamic,
    /// Fetched, and written to the static namespace
    FetchThenCacheStatic,
    /// Fetched, but the response was not cacheable
    FetchUncached,
    /// Network failed; answered with an offline fallback
    ServeOfflineFallback,
}

/// Result of offering a request to the interceptor.
#[derive(Debug, Clone)]
pub enum Interception {
    /// Not intercepted; the request goes to default network handling
    Passthrough,
    /// Intercepted and answered
    Respond {
        decision: InterceptDecision,
        response: FetchResponse,
    },
}

impl Interception {
    pub fn decision(&self) -> Option<InterceptDecision> {
        match self {
            Interception::Passthrough => None,
            Interception::Respond { decision, .. } => Some(*decision),
        }
    }

    pub fn response(self) -> Option<FetchResponse> {
        match self {
            Interception::Passthrough => None,
            Interception::Respond { response, .. } => Some(response),
        }
    }
}

// == Request Interceptor ==
/// Answers GET requests from the current namespaces or the network.
pub struct RequestInterceptor {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    namespaces: NamespaceSet,
    manifest: Arc<StaticAssetManifest>,
    fallback_key: String,
    writes: TaskTracker,
    stats: Arc<RwLock<InterceptStats>>,
}

impl RequestInterceptor {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        namespaces: NamespaceSet,
        manifest: Arc<StaticAssetManifest>,
    ) -> Self {
        let fallback_key = manifest.fallback_key();
        Self {
            storage,
            fetcher,
            namespaces,
            manifest,
            fallback_key,
            writes: TaskTracker::new(),
            stats: Arc::new(RwLock::new(InterceptStats::new())),
        }
    }

    /// Only GET requests over HTTP(S) are intercepted.
    pub fn should_intercept(request: &FetchRequest) -> bool {
        request.method == Method::GET && request.is_http()
    }

    /// Namespace role a cacheable response for `url` is written to.
    pub fn role_for(&self, url: &Url) -> CacheRole {
        if self.manifest.contains(url) {
            CacheRole::Static
        } else {
            CacheRole::Dynamic
        }
    }

    // == Intercept ==
    /// Offers a request to the interceptor.
    ///
    /// Never fails: network errors become offline fallbacks.
    pub async fn intercept(&self, request: &FetchRequest) -> Interception {
        if !Self::should_intercept(request) {
            debug!("Passing through {} {}", request.method, request.url);
            self.stats.write().await.record_passthrough();
            return Interception::Passthrough;
        }

        let started = Instant::now();
        let (decision, response) = self.respond(request).await;
        debug!(
            "Request to {} took {:?} ({:?}, {})",
            request.url,
            started.elapsed(),
            decision,
            response.status
        );

        Interception::Respond { decision, response }
    }

    async fn respond(&self, request: &FetchRequest) -> (InterceptDecision, FetchResponse) {
        let key = request.cache_key();

        if let Some(entry) = self.storage.match_url(&key).await {
            debug!("Serving from cache: {}", key);
            self.stats.write().await.record_hit();
            return (InterceptDecision::ServeCached, entry.response);
        }

        debug!("Fetching from network: {}", key);
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.stats.write().await.record_fetch();
                if !response.is_cacheable() {
                    return (InterceptDecision::FetchUncached, response);
                }

                let role = self.role_for(&request.url);
                spawn_cache_write(
                    &self.writes,
                    self.storage.clone(),
                    self.stats.clone(),
                    self.namespaces.for_role(role).id().to_string(),
                    CacheEntry::new(key, response.clone()),
                );

                let decision = match role {
                    CacheRole::Static => InterceptDecision::FetchThenCacheStatic,
                    CacheRole::Dynamic => InterceptDecision::FetchThenCacheDynamic,
                };
                (decision, response)
            }
            Err(err) => {
                warn!("Fetch failed for {}: {}", key, err);
                self.stats.write().await.record_fallback();
                (
                    InterceptDecision::ServeOfflineFallback,
                    self.offline_fallback(request).await,
                )
            }
        }
    }

    // == Offline Fallback ==
    /// HTML requests get the cached root document; everything else, or an
    /// HTML request when that document is missing, gets a 503.
    pub async fn offline_fallback(&self, request: &FetchRequest) -> FetchResponse {
        if request.accepts_html() {
            if let Some(entry) = self.storage.match_url(&self.fallback_key).await {
                return entry.response;
            }
            warn!("Offline fallback {} is not cached", self.fallback_key);
        }
        FetchResponse::offline()
    }

    // == Flush ==
    /// Waits for every background cache write started so far.
    pub async fn flush(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }

    /// Number of background writes still running.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    pub async fn stats(&self) -> InterceptStats {
        self.stats.read().await.clone()
    }
}
