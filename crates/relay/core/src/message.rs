//! FCM HTTP v1 message envelope.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::DeviceToken;

/// Notification content shared by every target of a send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Custom key/value payload, forwarded untouched.
    pub data: Map<String, Value>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, data: Option<Map<String, Value>>) -> Self {
        self.data = data.unwrap_or_default();
        self
    }
}

/// Top-level body of a `messages:send` request.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub message: Message,
}

/// Message addressed to a single device.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub token: DeviceToken,
    pub notification: NotificationPayload,
    pub data: Map<String, Value>,
}

/// Visible notification part of a message.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

/// Build the upstream envelope for one target.
pub fn compose(token: &DeviceToken, notification: &Notification) -> Envelope {
    Envelope {
        message: Message {
            token: token.clone(),
            notification: NotificationPayload {
                title: notification.title.clone(),
                body: notification.body.clone(),
            },
            data: notification.data.clone(),
        },
    }
}
