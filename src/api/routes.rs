//! API Routes
//!
//! Configures the Axum router: worker endpoints under `/__worker`, everything
//! else dispatched as a fetch event.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, message_handler, notification_click_handler, proxy_handler, push_handler,
    stats_handler, sync_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /__worker/message` - Control message (`SKIP_WAITING`, `GET_VERSION`)
/// - `POST /__worker/push` - Push payload to notification
/// - `POST /__worker/notificationclick` - Notification action to client action
/// - `POST /__worker/sync` - Background sync
/// - `GET /__worker/stats` - Lifecycle and interception statistics
/// - `GET /__worker/health` - Health check endpoint
/// - anything else - Proxied through the worker
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/__worker/message", post(message_handler))
        .route("/__worker/push", post(push_handler))
        .route("/__worker/notificationclick", post(notification_click_handler))
        .route("/__worker/sync", post(sync_handler))
        .route("/__worker/stats", get(stats_handler))
        .route("/__worker/health", get(health_handler))
        .fallback(proxy_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
