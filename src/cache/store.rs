//! Memory Cache Storage Module
//!
//! In-memory namespace store with per-namespace quotas.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStorage, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_ENTRIES};
use crate::error::{Result, WorkerError};

// == Namespace ==
/// Entries of a single namespace.
#[derive(Debug)]
struct Namespace {
    name: String,
    entries: HashMap<String, CacheEntry>,
}

impl Namespace {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: HashMap::new(),
        }
    }
}

// == Memory Cache Storage ==
/// Namespace store kept in process memory.
///
/// Cloning yields another handle to the same namespaces.
#[derive(Debug, Clone)]
pub struct MemoryCacheStorage {
    /// Namespaces in creation order
    namespaces: Arc<RwLock<Vec<Namespace>>>,
    /// Maximum number of entries per namespace
    max_entries: usize,
    /// Maximum body size of a single entry
    max_body_size: usize,
}

impl MemoryCacheStorage {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries a namespace can hold
    /// * `max_body_size` - Largest response body that can be stored, in bytes
    pub fn new(max_entries: usize, max_body_size: usize) -> Self {
        Self {
            namespaces: Arc::new(RwLock::new(Vec::new())),
            max_entries,
            max_body_size,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_entries, config.max_body_size)
    }

    // == Quota Check ==
    /// Rejects entries that would not fit. `len` is the current number of
    /// entries in the namespace and `new_keys` how many of the pending entries
    /// are not already present.
    fn check_quota(&self, name: &str, entry: &CacheEntry, len: usize, new_keys: usize) -> Result<()> {
        if entry.size() > self.max_body_size {
            return Err(WorkerError::CacheWrite(format!(
                "Response for {} exceeds maximum size of {} bytes",
                entry.url, self.max_body_size
            )));
        }

        if len + new_keys > self.max_entries {
            return Err(WorkerError::CacheWrite(format!(
                "Quota exceeded: namespace '{}' is limited to {} entries",
                name, self.max_entries
            )));
        }

        Ok(())
    }
}

impl Default for MemoryCacheStorage {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MAX_BODY_SIZE)
    }
}

/// Returns the namespace, creating it at the end of the creation order.
fn open_namespace<'a>(namespaces: &'a mut Vec<Namespace>, name: &str) -> &'a mut Namespace {
    let index = match namespaces.iter().position(|ns| ns.name == name) {
        Some(index) => index,
        None => {
            namespaces.push(Namespace::new(name));
            namespaces.len() - 1
        }
    };
    &mut namespaces[index]
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        open_namespace(&mut namespaces, name);
        Ok(())
    }

    async fn has(&self, name: &str) -> bool {
        let namespaces = self.namespaces.read().await;
        namespaces.iter().any(|ns| ns.name == name)
    }

    async fn match_url(&self, url: &str) -> Option<CacheEntry> {
        let namespaces = self.namespaces.read().await;
        namespaces
            .iter()
            .find_map(|ns| ns.entries.get(url))
            .cloned()
    }

    async fn match_in(&self, name: &str, url: &str) -> Option<CacheEntry> {
        let namespaces = self.namespaces.read().await;
        namespaces
            .iter()
            .find(|ns| ns.name == name)
            .and_then(|ns| ns.entries.get(url))
            .cloned()
    }

    async fn put(&self, name: &str, entry: CacheEntry) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        let namespace = open_namespace(&mut namespaces, name);

        let is_overwrite = namespace.entries.contains_key(&entry.url);
        let new_keys = if is_overwrite { 0 } else { 1 };
        self.check_quota(name, &entry, namespace.entries.len(), new_keys)?;

        namespace.entries.insert(entry.url.clone(), entry);
        Ok(())
    }

    async fn put_all(&self, name: &str, entries: Vec<CacheEntry>) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        let namespace = open_namespace(&mut namespaces, name);

        // Validate everything before touching the namespace
        let mut pending: Vec<&str> = Vec::new();
        for entry in &entries {
            if !namespace.entries.contains_key(&entry.url) && !pending.contains(&entry.url.as_str()) {
                pending.push(&entry.url);
            }
            self.check_quota(name, entry, namespace.entries.len(), pending.len())?;
        }

        for entry in entries {
            namespace.entries.insert(entry.url.clone(), entry);
        }
        Ok(())
    }

    async fn keys(&self) -> Vec<String> {
        let namespaces = self.namespaces.read().await;
        namespaces.iter().map(|ns| ns.name.clone()).collect()
    }

    async fn delete(&self, name: &str) -> bool {
        let mut namespaces = self.namespaces.write().await;
        let before = namespaces.len();
        namespaces.retain(|ns| ns.name != name);
        namespaces.len() != before
    }

    async fn urls(&self, name: &str) -> Vec<String> {
        let namespaces = self.namespaces.read().await;
        namespaces
            .iter()
            .find(|ns| ns.name == name)
            .map(|ns| ns.entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}
