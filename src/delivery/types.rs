//! Delivery types, errors and the sender trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The configured homeserver URL cannot be used
    #[error("Invalid homeserver URL: {0}")]
    InvalidHomeserver(String),

    /// Transport-level failure (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat server answered with a non-success status
    #[error("Chat server rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Chat message type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[default]
    #[serde(rename = "m.text")]
    Text,
    #[serde(rename = "m.notice")]
    Notice,
}

impl MessageKind {
    pub fn from_notice(notice: bool) -> Self {
        if notice {
            MessageKind::Notice
        } else {
            MessageKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "m.text",
            MessageKind::Notice => "m.notice",
        }
    }
}

/// A rendered message addressed to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub room_id: String,
    /// Markdown source of the message
    pub body: String,
    pub kind: MessageKind,
}

impl OutgoingMessage {
    pub fn new(room_id: impl Into<String>, body: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            room_id: room_id.into(),
            body: body.into(),
            kind,
        }
    }
}

/// Result of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Event ID assigned by the chat server
    pub event_id: String,
}

/// Sends rendered messages to a chat destination.
///
/// Implementations make a single attempt; retries are not part of the contract.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt, DeliveryError>;

    /// Short name used in logs and metrics
    fn name(&self) -> &'static str;
}
