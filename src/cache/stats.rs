//! Interception Statistics Module
//!
//! Tracks how requests were answered: from cache, from the network, or by an
//! offline fallback.

use serde::Serialize;

// == Intercept Stats ==
/// Tracks interceptor metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterceptStats {
    /// Requests answered from a cache namespace
    pub cache_hits: u64,
    /// Requests that reached the network
    pub network_fetches: u64,
    /// Responses written to a namespace
    pub cache_writes: u64,
    /// Background writes that failed
    pub write_failures: u64,
    /// Requests answered by an offline fallback
    pub offline_fallbacks: u64,
    /// Requests left to default network handling
    pub passthroughs: u64,
}

impl InterceptStats {
    // == Constructor ==
    /// Creates a new InterceptStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + network fetches + fallbacks), or 0.0 if no
    /// request has been intercepted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.network_fetches + self.offline_fallbacks;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_fetch(&mut self) {
        self.network_fetches += 1;
    }

    pub fn record_write(&mut self) {
        self.cache_writes += 1;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }

    pub fn record_fallback(&mut self) {
        self.offline_fallbacks += 1;
    }

    pub fn record_passthrough(&mut self) {
        self.passthroughs += 1;
    }
}
