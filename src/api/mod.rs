//! API Module
//!
//! HTTP host for the worker. The host stands in for the browser: it forwards
//! every page request to the worker's fetch handler and exposes the other
//! worker events as endpoints.
//!
//! # Endpoints
//! - `POST /__worker/message` - Control channel
//! - `POST /__worker/push` - Push notification
//! - `POST /__worker/notificationclick` - Notification click
//! - `POST /__worker/sync` - Background sync
//! - `GET /__worker/stats` - Worker statistics
//! - `GET /__worker/health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
