//! Cache Storage Trait
//!
//! The process-wide namespace store. The worker never reaches a global: the
//! lifecycle manager and the interceptor both receive the store explicitly.

use async_trait::async_trait;

use crate::cache::CacheEntry;
use crate::error::Result;

/// Keyed store of named cache namespaces.
///
/// Namespaces are enumerated in creation order. Lookups across namespaces
/// follow the same order.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the namespace, creating it if absent.
    async fn open(&self, name: &str) -> Result<()>;

    /// True if the namespace exists.
    async fn has(&self, name: &str) -> bool;

    /// Looks `url` up across every namespace.
    async fn match_url(&self, url: &str) -> Option<CacheEntry>;

    /// Looks `url` up in a single namespace.
    async fn match_in(&self, name: &str, url: &str) -> Option<CacheEntry>;

    /// Stores `entry` under its URL, creating the namespace if needed.
    /// An existing entry for the same URL is replaced.
    async fn put(&self, name: &str, entry: CacheEntry) -> Result<()>;

    /// Stores every entry or none of them.
    ///
    /// The default implementation is not atomic; stores that can check their
    /// limits up front should override it.
    async fn put_all(&self, name: &str, entries: Vec<CacheEntry>) -> Result<()> {
        self.open(name).await?;
        for entry in entries {
            self.put(name, entry).await?;
        }
        Ok(())
    }

    /// Identifiers of every existing namespace.
    async fn keys(&self) -> Vec<String>;

    /// Deletes a namespace and all of its entries. Returns false if it did
    /// not exist.
    async fn delete(&self, name: &str) -> bool;

    /// URLs stored in a namespace (empty if it does not exist).
    async fn urls(&self, name: &str) -> Vec<String>;

    /// Number of entries in a namespace.
    async fn len(&self, name: &str) -> usize {
        self.urls(name).await.len()
    }
}
