//! Configuration Module
//!
//! Handles loading and managing worker configuration from environment variables.
//! The static asset manifest is not configurable here; it is fixed at build time
//! in [`crate::manifest`].

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Worker configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name used as the namespace prefix
    pub app_name: String,
    /// Human-readable name used in notifications
    pub display_name: String,
    /// Version tag shared by the static and dynamic namespaces
    pub cache_version: String,
    /// Origin of the site the worker caches for
    pub origin: String,
    /// HTTP server port
    pub server_port: u16,
    /// Upper bound on a single network fetch, in seconds
    pub fetch_timeout: u64,
    /// Maximum number of entries a single namespace can hold
    pub max_entries: usize,
    /// Maximum body size of a cached response, in bytes
    pub max_body_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_NAME` - Namespace prefix (default: quantivision)
    /// - `APP_DISPLAY_NAME` - Notification title (default: Quantivision)
    /// - `CACHE_VERSION` - Namespace version tag (default: v1.0.0)
    /// - `ORIGIN` - Site origin (default: http://localhost:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `FETCH_TIMEOUT_SECS` - Network fetch timeout (default: 10)
    /// - `MAX_ENTRIES` - Entries per namespace (default: 1000)
    /// - `MAX_BODY_SIZE` - Largest cacheable body in bytes (default: 10 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            display_name: env::var("APP_DISPLAY_NAME").unwrap_or(defaults.display_name),
            cache_version: env::var("CACHE_VERSION").unwrap_or(defaults.cache_version),
            origin: env::var("ORIGIN").unwrap_or(defaults.origin),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            fetch_timeout: parsed_var("FETCH_TIMEOUT_SECS").unwrap_or(defaults.fetch_timeout),
            max_entries: parsed_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            max_body_size: parsed_var("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
        }
    }

    /// Returns the network fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

/// Reads and parses a variable, ignoring unset or malformed values.
fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "quantivision".to_string(),
            display_name: "Quantivision".to_string(),
            cache_version: "v1.0.0".to_string(),
            origin: "http://localhost:8080".to_string(),
            server_port: 3000,
            fetch_timeout: 10,
            max_entries: 1000,
            max_body_size: 10 * 1024 * 1024,
        }
    }
}
