use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body for a delivered webhook
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub endpoint: String,
    pub room_id: String,
    /// Event ID assigned by the chat server
    pub event_id: String,
    /// Placeholder keys that rendered as the sentinel
    pub unresolved: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
