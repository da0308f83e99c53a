//! API Handlers
//!
//! HTTP request handlers through which the host drives the worker.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;
use url::Url;

use crate::cache::MemoryCacheStorage;
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::models::{
    HealthResponse, NotificationClickRequest, StatsResponse, SyncRequest, SyncResponse,
};
use crate::net::{FetchRequest, HttpFetcher};
use crate::worker::{ClientAction, Interception, Notification, ServiceWorker};

/// Largest request body forwarded to the origin.
pub const MAX_PROXY_BODY: usize = 16 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker every request is dispatched to
    pub worker: Arc<ServiceWorker>,
    /// Origin proxied requests are resolved against
    pub origin: Url,
}

impl AppState {
    /// Creates a new AppState around an existing worker.
    pub fn new(worker: ServiceWorker, origin: Url) -> Self {
        Self {
            worker: Arc::new(worker),
            origin,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires an in-memory namespace store and a reqwest fetcher bounded by the
    /// configured timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let origin = Url::parse(&config.origin).map_err(|e| {
            WorkerError::InvalidRequest(format!("Invalid origin '{}': {}", config.origin, e))
        })?;
        let storage = Arc::new(MemoryCacheStorage::from_config(config));
        let fetcher = Arc::new(HttpFetcher::new(origin.clone(), config.fetch_timeout())?);
        let worker = ServiceWorker::new(config, storage, fetcher)?;
        Ok(Self::new(worker, origin))
    }
}

/// Handler for POST /__worker/message
///
/// Dispatches a control message. `GET_VERSION` answers with the version
/// reply; every other message answers 204.
pub async fn message_handler(State(state): State<AppState>, Json(data): Json<Value>) -> Response {
    let (tx, rx) = oneshot::channel();
    state.worker.on_message(&data, Some(tx)).await;

    match rx.await {
        Ok(reply) => Json(reply).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Handler for POST /__worker/push
///
/// The raw body is the push payload; an empty body means no payload.
pub async fn push_handler(State(state): State<AppState>, payload: String) -> Json<Notification> {
    let payload = Some(payload.as_str()).filter(|text| !text.is_empty());
    Json(state.worker.on_push(payload))
}

/// Handler for POST /__worker/notificationclick
pub async fn notification_click_handler(
    State(state): State<AppState>,
    Json(req): Json<NotificationClickRequest>,
) -> Json<ClientAction> {
    Json(state.worker.on_notification_click(&req.action))
}

/// Handler for POST /__worker/sync
pub async fn sync_handler(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(WorkerError::InvalidRequest(error_msg));
    }

    let handled = state.worker.on_sync(&req.tag).await;
    Ok(Json(SyncResponse {
        tag: req.tag,
        handled,
    }))
}

/// Handler for GET /__worker/stats
///
/// Returns lifecycle state, namespaces and interception statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let worker = &state.worker;
    let lifecycle = worker.lifecycle();

    Json(StatsResponse::new(
        worker.version(),
        lifecycle.state().await,
        lifecycle.is_controlling().await,
        lifecycle.namespace_ids().await,
        lifecycle.static_cache_size().await,
        worker.interceptor().stats().await,
    ))
}

/// Handler for GET /__worker/health
///
/// Returns health status of the host.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fallback handler for every other request
///
/// Rebuilds the request against the origin and dispatches it as a fetch
/// event. Requests the worker does not intercept are fetched as-is.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Result<Response> {
    let fetch_request = to_fetch_request(&state.origin, request).await?;

    match state.worker.on_fetch(&fetch_request).await {
        Interception::Respond { decision, response } => {
            debug!("{} answered with {:?}", fetch_request.url, decision);
            Ok(response.into_response())
        }
        Interception::Passthrough => {
            let response = state.worker.fetch_passthrough(&fetch_request).await?;
            Ok(response.into_response())
        }
    }
}

async fn to_fetch_request(origin: &Url, request: Request) -> Result<FetchRequest> {
    let (parts, body) = request.into_parts();

    // Only the path and query are taken from the request; the scheme and
    // host always come from the origin, even for paths like `//other.host`.
    let mut url = origin.clone();
    url.set_path(parts.uri.path());
    url.set_query(parts.uri.query());

    let body = to_bytes(body, MAX_PROXY_BODY)
        .await
        .map_err(|e| WorkerError::InvalidRequest(format!("Failed to read body: {}", e)))?;

    let mut headers = parts.headers;
    headers.remove(header::HOST);

    Ok(FetchRequest {
        method: parts.method,
        url,
        headers,
        body,
    })
}
