//! Request DTOs for the worker's host endpoints
//!
//! Defines the structure of incoming HTTP request bodies. Control messages are
//! read as raw JSON so unknown kinds can be ignored rather than rejected.

use serde::Deserialize;

/// Request body for POST /__worker/notificationclick
///
/// # Fields
/// - `action`: The clicked action, empty when the notification body was clicked
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationClickRequest {
    #[serde(default)]
    pub action: String,
}

/// Request body for POST /__worker/sync
#[derive(Debug, Clone, Deserialize)]
pub struct SyncRequest {
    /// The sync registration tag
    pub tag: String,
}

impl SyncRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tag.trim().is_empty() {
            return Some("Sync tag cannot be empty".to_string());
        }
        None
    }
}
