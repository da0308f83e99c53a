//! Worker Module
//!
//! The worker as the host runtime sees it: one dispatch method per event kind.
//!
//! # Events
//! - install / activate: [`LifecycleManager`]
//! - fetch: [`RequestInterceptor`]
//! - message: [`ControlChannel`]
//! - push / notificationclick: [`Notification`], [`ClientAction`]
//! - sync: background sync acknowledgement

mod control;
mod interceptor;
mod lifecycle;
mod notification;

pub use control::{ControlChannel, ControlMessage, ReplyPort};
pub use interceptor::{InterceptDecision, Interception, RequestInterceptor};
pub use lifecycle::{InstallReport, LifecycleManager, WorkerState};
pub use notification::{ClientAction, Notification, NotificationAction, NotificationData};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{CacheStorage, NamespaceSet};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::manifest::StaticAssetManifest;
use crate::net::{FetchRequest, FetchResponse, Fetcher};

/// Tag acknowledged by the sync handler.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

// == Service Worker ==
/// The offline caching worker.
pub struct ServiceWorker {
    lifecycle: Arc<LifecycleManager>,
    interceptor: RequestInterceptor,
    control: ControlChannel,
    fetcher: Arc<dyn Fetcher>,
    display_name: String,
}

impl ServiceWorker {
    /// Creates a worker using the built-in manifest resolved against the
    /// configured origin.
    pub fn new(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let origin = Url::parse(&config.origin).map_err(|e| {
            WorkerError::InvalidRequest(format!("Invalid origin '{}': {}", config.origin, e))
        })?;
        let manifest = StaticAssetManifest::for_origin(&origin)?;
        Ok(Self::with_manifest(config, storage, fetcher, manifest))
    }

    pub fn with_manifest(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        manifest: StaticAssetManifest,
    ) -> Self {
        let namespaces = NamespaceSet::from_config(config);
        let manifest = Arc::new(manifest);

        let lifecycle = Arc::new(LifecycleManager::new(
            storage.clone(),
            fetcher.clone(),
            namespaces.clone(),
            manifest.clone(),
        ));
        let interceptor =
            RequestInterceptor::new(storage, fetcher.clone(), namespaces, manifest);
        let control = ControlChannel::new(lifecycle.clone());

        Self {
            lifecycle,
            interceptor,
            control,
            fetcher,
            display_name: config.display_name.clone(),
        }
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn interceptor(&self) -> &RequestInterceptor {
        &self.interceptor
    }

    /// Identifier of the current static namespace.
    pub fn version(&self) -> &str {
        self.lifecycle.namespaces().static_ns().id()
    }

    // == Start ==
    /// Install, skip waiting, activate and claim, each step awaited before the
    /// next so no request is served from a stale namespace.
    pub async fn start(&self) -> Result<InstallReport> {
        let report = self.on_install().await?;
        self.lifecycle.skip_waiting().await;
        self.on_activate().await?;
        Ok(report)
    }

    // == Events ==
    pub async fn on_install(&self) -> Result<InstallReport> {
        self.lifecycle.install().await
    }

    /// Prunes stale namespaces, then claims the open pages.
    pub async fn on_activate(&self) -> Result<Vec<String>> {
        self.lifecycle.activate_and_claim().await
    }

    /// Requests are only intercepted once the worker controls the pages.
    pub async fn on_fetch(&self, request: &FetchRequest) -> Interception {
        if !self.lifecycle.is_controlling().await {
            debug!("Not controlling yet, passing through {}", request.url);
            return Interception::Passthrough;
        }
        self.interceptor.intercept(request).await
    }

    pub async fn on_message(&self, data: &Value, reply: Option<ReplyPort>) {
        self.control.handle(ControlMessage::from_value(data), reply).await;
    }

    pub fn on_push(&self, payload: Option<&str>) -> Notification {
        Notification::from_push(&self.display_name, payload)
    }

    pub fn on_notification_click(&self, action: &str) -> ClientAction {
        ClientAction::for_click(action)
    }

    /// Returns true if the tag was handled.
    pub async fn on_sync(&self, tag: &str) -> bool {
        if tag == BACKGROUND_SYNC_TAG {
            info!("Background sync triggered");
            true
        } else {
            debug!("Ignoring sync tag {}", tag);
            false
        }
    }

    // == Default Network Handling ==
    /// Fetches a request the worker did not intercept, without caching.
    pub async fn fetch_passthrough(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.fetcher.fetch(request).await
    }

    /// Waits for pending cache writes.
    pub async fn shutdown(&self) {
        let pending = self.interceptor.pending_writes();
        if pending > 0 {
            warn!("Waiting for {} pending cache writes", pending);
        }
        self.interceptor.flush().await;
    }
}
