//! Response DTOs for the worker's host endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::InterceptStats;
use crate::worker::WorkerState;

/// Reply to a `GET_VERSION` control message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReply {
    /// Current static namespace identifier
    pub version: String,
}

/// Response body for POST /__worker/sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub tag: String,
    pub handled: bool,
}

/// Response body for GET /__worker/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current static namespace identifier
    pub version: String,
    /// Lifecycle state
    pub state: WorkerState,
    /// Whether the worker controls the open pages
    pub controlling: bool,
    /// Existing namespaces in creation order
    pub namespaces: Vec<String>,
    /// Entries in the current static namespace
    pub static_entries: usize,
    /// Interception counters
    #[serde(flatten)]
    pub stats: InterceptStats,
    /// Hit rate (hits / intercepted requests)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(
        version: impl Into<String>,
        state: WorkerState,
        controlling: bool,
        namespaces: Vec<String>,
        static_entries: usize,
        stats: InterceptStats,
    ) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            version: version.into(),
            state,
            controlling,
            namespaces,
            static_entries,
            stats,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /__worker/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
