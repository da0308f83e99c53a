//! Control-Channel Handler
//!
//! Out-of-band messages from the controlling page.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::models::VersionReply;
use crate::worker::LifecycleManager;

// == Control Message ==
/// Messages understood by the worker, keyed by their `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Activate a waiting worker immediately
    SkipWaiting,
    /// Reply with the current static namespace identifier
    GetVersion,
    /// Anything else; ignored
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    /// Reads a message from arbitrary JSON. Payloads that are not objects or
    /// carry no `type` are [`ControlMessage::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(ControlMessage::Unknown)
    }
}

/// Reply port a message may carry.
pub type ReplyPort = oneshot::Sender<VersionReply>;

// == Control Channel ==
pub struct ControlChannel {
    lifecycle: Arc<LifecycleManager>,
}

impl ControlChannel {
    pub fn new(lifecycle: Arc<LifecycleManager>) -> Self {
        Self { lifecycle }
    }

    /// Handles one message. Never fails: unknown kinds and a missing or
    /// closed reply port are ignored.
    pub async fn handle(&self, message: ControlMessage, reply: Option<ReplyPort>) {
        match message {
            ControlMessage::SkipWaiting => {
                info!("Skip waiting requested");
                if self.lifecycle.skip_waiting().await {
                    if let Err(err) = self.lifecycle.activate_and_claim().await {
                        warn!("Activation after skip waiting failed: {}", err);
                    }
                }
            }
            ControlMessage::GetVersion => {
                let version = self.lifecycle.namespaces().static_ns().id().to_string();
                match reply {
                    Some(port) => {
                        if port.send(VersionReply { version }).is_err() {
                            debug!("Version requested but the reply port was closed");
                        }
                    }
                    None => debug!("Version requested without a reply port"),
                }
            }
            ControlMessage::Unknown => debug!("Ignoring unknown control message"),
        }
    }
}
