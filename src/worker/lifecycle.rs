//! Cache Lifecycle Manager
//!
//! Install pre-populates the static namespace, activation prunes every stale
//! namespace, and claiming control lets the worker intercept open pages.

use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::cache::{CacheEntry, CacheStorage, NamespaceSet};
use crate::error::{Result, WorkerError};
use crate::manifest::StaticAssetManifest;
use crate::net::{FetchRequest, Fetcher};

// == Worker State ==
/// Lifecycle state of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    #[default]
    Parsed,
    Installing,
    /// Installed and waiting to activate
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

// == Install Report ==
/// Outcome of an install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Static namespace that was populated
    pub namespace: String,
    /// Number of assets written
    pub cached: usize,
    /// Why the manifest could not be cached, if it could not
    pub failure: Option<String>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LifecycleStatus {
    state: WorkerState,
    skip_waiting: bool,
    controlling: bool,
    /// Pages still controlled by the previous worker
    held_clients: usize,
}

// == Lifecycle Manager ==
/// Owns namespace versioning and the install/activate/claim sequence.
pub struct LifecycleManager {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    namespaces: NamespaceSet,
    manifest: Arc<StaticAssetManifest>,
    status: RwLock<LifecycleStatus>,
}

impl LifecycleManager {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        namespaces: NamespaceSet,
        manifest: Arc<StaticAssetManifest>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            namespaces,
            manifest,
            status: RwLock::new(LifecycleStatus::default()),
        }
    }

    pub fn namespaces(&self) -> &NamespaceSet {
        &self.namespaces
    }

    pub async fn state(&self) -> WorkerState {
        self.status.read().await.state
    }

    /// True once the worker has claimed the open pages.
    pub async fn is_controlling(&self) -> bool {
        self.status.read().await.controlling
    }

    /// Records how many pages the previous worker still controls. A waiting
    /// worker only activates once this drops to zero or skip-waiting is set.
    pub async fn set_held_clients(&self, count: usize) {
        self.status.write().await.held_clients = count;
    }

    async fn set_state(&self, state: WorkerState) {
        self.status.write().await.state = state;
    }

    // == Install ==
    /// Opens the static namespace and caches every manifest asset.
    ///
    /// A manifest failure is logged and reported but the worker still reaches
    /// the installed state; whether to skip waiting is the caller's decision.
    /// An installed worker may install again to retry its manifest. Once
    /// activated it cannot, since that would drop control of its pages.
    pub async fn install(&self) -> Result<InstallReport> {
        {
            let mut status = self.status.write().await;
            if !matches!(status.state, WorkerState::Parsed | WorkerState::Installed) {
                return Err(WorkerError::InvalidState(format!(
                    "cannot install while {}",
                    status.state
                )));
            }
            status.state = WorkerState::Installing;
        }

        let namespace = self.namespaces.static_ns().id().to_string();
        info!("Installing into {}", namespace);

        let report = match self.cache_static_files().await {
            Ok(cached) => {
                info!("Cached {} static files", cached);
                InstallReport {
                    namespace,
                    cached,
                    failure: None,
                }
            }
            Err(err) => {
                error!("{}", err);
                InstallReport {
                    namespace,
                    cached: 0,
                    failure: Some(err.to_string()),
                }
            }
        };

        self.set_state(WorkerState::Installed).await;
        Ok(report)
    }

    /// Fetches the whole manifest, then writes it in one step. Nothing is
    /// written unless every asset came back ok.
    async fn cache_static_files(&self) -> Result<usize> {
        let namespace = self.namespaces.static_ns().id();
        self.storage.open(namespace).await?;

        let fetches = self.manifest.entries().iter().map(|url| async move {
            let request = FetchRequest::new(Method::GET, url.clone());
            let response = self.fetcher.fetch(&request).await.map_err(|e| {
                WorkerError::ManifestCacheFailure(format!("{}: {}", url, e))
            })?;
            if !response.is_ok() {
                return Err(WorkerError::ManifestCacheFailure(format!(
                    "{} returned {}",
                    url, response.status
                )));
            }
            Ok::<_, WorkerError>(CacheEntry::new(request.cache_key(), response))
        });
        let entries = try_join_all(fetches).await?;

        let cached = entries.len();
        self.storage
            .put_all(namespace, entries)
            .await
            .map_err(|e| WorkerError::ManifestCacheFailure(e.to_string()))?;
        Ok(cached)
    }

    // == Skip Waiting ==
    /// Lets a waiting worker activate without waiting for the previous
    /// worker's pages to close. Returns true if the worker is waiting now.
    pub async fn skip_waiting(&self) -> bool {
        let mut status = self.status.write().await;
        status.skip_waiting = true;
        status.state == WorkerState::Installed
    }

    // == Activate ==
    /// Deletes every namespace other than the current static and dynamic
    /// ones, returning the deleted identifiers.
    ///
    /// Re-running on an active worker is allowed and deletes nothing unless a
    /// stale namespace appeared in between.
    pub async fn activate(&self) -> Result<Vec<String>> {
        {
            let mut status = self.status.write().await;
            match status.state {
                WorkerState::Installed => {
                    if !status.skip_waiting && status.held_clients > 0 {
                        return Err(WorkerError::InvalidState(format!(
                            "waiting for {} clients of the previous worker",
                            status.held_clients
                        )));
                    }
                    status.state = WorkerState::Activating;
                }
                WorkerState::Activated => {}
                other => {
                    return Err(WorkerError::InvalidState(format!(
                        "cannot activate while {}",
                        other
                    )));
                }
            }
        }

        info!("Activating {}", self.namespaces.static_ns());

        let mut deleted = Vec::new();
        for name in self.storage.keys().await {
            if self.namespaces.is_current(&name) {
                continue;
            }
            info!("Deleting old cache: {}", name);
            if self.storage.delete(&name).await {
                deleted.push(name);
            }
        }

        self.set_state(WorkerState::Activated).await;
        Ok(deleted)
    }

    // == Claim Control ==
    /// Makes this worker the controller of every open page.
    pub async fn claim_control(&self) -> Result<()> {
        let mut status = self.status.write().await;
        if status.state != WorkerState::Activated {
            return Err(WorkerError::InvalidState(format!(
                "cannot claim clients while {}",
                status.state
            )));
        }
        status.controlling = true;
        status.held_clients = 0;
        info!("Claimed clients");
        Ok(())
    }

    /// Activation followed by claiming, as the activate event does.
    pub async fn activate_and_claim(&self) -> Result<Vec<String>> {
        let deleted = self.activate().await?;
        self.claim_control().await?;
        Ok(deleted)
    }

    /// Marks the worker as replaced. It stops intercepting.
    pub async fn retire(&self) {
        let mut status = self.status.write().await;
        status.state = WorkerState::Redundant;
        status.controlling = false;
        warn!("Worker for {} is redundant", self.namespaces.static_ns());
    }

    // == Maintenance ==
    /// Deletes every namespace that does not belong to this application.
    pub async fn clear_foreign_caches(&self) -> Vec<String> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await {
            if !name.contains(self.namespaces.app()) && self.storage.delete(&name).await {
                info!("Deleted foreign cache: {}", name);
                deleted.push(name);
            }
        }
        deleted
    }

    /// Identifiers of every existing namespace, current or not.
    pub async fn namespace_ids(&self) -> Vec<String> {
        self.storage.keys().await
    }

    /// Number of entries in the current static namespace.
    pub async fn static_cache_size(&self) -> usize {
        self.storage.len(self.namespaces.static_ns().id()).await
    }
}
