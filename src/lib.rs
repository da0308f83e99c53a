//! Offline Worker - An offline asset cache for a marketing site
//!
//! Pre-populates versioned cache namespaces, prunes stale ones on activation,
//! and answers requests cache-first with network and offline fallbacks.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod net;
pub mod tasks;
pub mod worker;

#[cfg(test)]
mod testing;

pub use api::AppState;
pub use config::Config;
pub use worker::ServiceWorker;
