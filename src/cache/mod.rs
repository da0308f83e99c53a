//! Cache Module
//!
//! Versioned cache namespaces and the storage that holds them.

mod entry;
mod namespace;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use namespace::{CacheNamespace, CacheRole, NamespaceSet};
pub use stats::InterceptStats;
pub use storage::CacheStorage;
pub use store::MemoryCacheStorage;

// == Public Constants ==
/// Default number of entries a single namespace can hold
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default maximum body size of a cached response in bytes
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10 MB
