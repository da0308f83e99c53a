//! Cache Entry Module
//!
//! Defines the structure of a stored response.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::net::FetchResponse;

// == Cache Entry ==
/// A response stored under its request URL.
///
/// Entries are replaced whole on re-fetch, never partially updated.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cache key (request URL without fragment)
    pub url: String,
    /// The stored response
    pub response: FetchResponse,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// # Arguments
    /// * `url` - The cache key
    /// * `response` - The response to store
    pub fn new(url: impl Into<String>, response: FetchResponse) -> Self {
        Self {
            url: url.into(),
            response,
            stored_at: current_timestamp_ms(),
        }
    }

    // == Age ==
    /// Milliseconds since the entry was stored.
    ///
    /// Entries are served regardless of age; this is informational only.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }

    // == Size ==
    /// Size of the stored body in bytes.
    pub fn size(&self) -> usize {
        self.response.body.len()
    }
}

// == Helper Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
