//! Push Notifications
//!
//! Turns push payloads into notifications and notification clicks into page
//! actions.

use serde::Serialize;

/// Icon and badge shown with every notification.
pub const NOTIFICATION_ICON: &str = "/assets/logo.svg";

/// Vibration pattern in milliseconds.
pub const VIBRATE_PATTERN: [u32; 3] = [200, 100, 200];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Arrival time (Unix milliseconds)
    pub date_of_arrival: i64,
    pub primary_key: u32,
}

// == Notification ==
/// A notification ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Builds the notification for a push. Without a payload a generic body
    /// naming the site is used.
    pub fn from_push(display_name: &str, payload: Option<&str>) -> Self {
        let body = match payload {
            Some(text) => text.to_string(),
            None => format!("New notification from {}", display_name),
        };

        Self {
            title: display_name.to_string(),
            body,
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_ICON.to_string(),
            vibrate: VIBRATE_PATTERN.to_vec(),
            data: NotificationData {
                date_of_arrival: chrono::Utc::now().timestamp_millis(),
                primary_key: 1,
            },
            actions: vec![
                NotificationAction {
                    action: "explore".to_string(),
                    title: "View Details".to_string(),
                    icon: NOTIFICATION_ICON.to_string(),
                },
                NotificationAction {
                    action: "close".to_string(),
                    title: "Close".to_string(),
                    icon: NOTIFICATION_ICON.to_string(),
                },
            ],
        }
    }
}

// == Client Action ==
/// What the worker does after a notification is clicked. The notification
/// itself is always closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientAction {
    /// Open a window at `url`
    OpenWindow { url: String },
    /// Nothing beyond closing the notification
    Dismiss,
}

impl ClientAction {
    pub fn for_click(action: &str) -> Self {
        match action {
            "explore" => ClientAction::OpenWindow {
                url: "/".to_string(),
            },
            _ => ClientAction::Dismiss,
        }
    }
}
