//! Matrix client-server API sender

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::config::MatrixConfig;

use super::markdown;
use super::types::{DeliveryError, DeliveryReceipt, MessageSender, OutgoingMessage};

const HTML_FORMAT: &str = "org.matrix.custom.html";

/// Sends `m.room.message` events through a homeserver
#[derive(Clone)]
pub struct MatrixSender {
    client: Client,
    homeserver: Url,
    access_token: String,
}

impl MatrixSender {
    pub fn new(config: &MatrixConfig) -> Result<Self, DeliveryError> {
        let homeserver = Url::parse(&config.homeserver)
            .map_err(|e| DeliveryError::InvalidHomeserver(format!("{}: {e}", config.homeserver)))?;

        if homeserver.cannot_be_a_base() {
            return Err(DeliveryError::InvalidHomeserver(config.homeserver.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            homeserver,
            access_token: config.access_token.clone(),
        })
    }

    /// URL of the send endpoint for a room and transaction
    fn send_url(&self, room_id: &str, txn_id: &str) -> Result<Url, DeliveryError> {
        let mut url = self.homeserver.clone();
        url.path_segments_mut()
            .map_err(|_| DeliveryError::InvalidHomeserver(self.homeserver.to_string()))?
            .pop_if_empty()
            .extend([
                "_matrix",
                "client",
                "v3",
                "rooms",
                room_id,
                "send",
                "m.room.message",
                txn_id,
            ]);
        Ok(url)
    }

    fn event_content(message: &OutgoingMessage) -> serde_json::Value {
        json!({
            "msgtype": message.kind.as_str(),
            "body": message.body,
            "format": HTML_FORMAT,
            "formatted_body": markdown::to_html(&message.body),
        })
    }
}

#[async_trait]
impl MessageSender for MatrixSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let txn_id = Uuid::new_v4().to_string();
        let url = self.send_url(&message.room_id, &txn_id)?;

        debug!(room_id = %message.room_id, txn_id = %txn_id, "Sending message to homeserver");

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&Self::event_content(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt: DeliveryReceipt = response.json().await?;
        debug!(event_id = %receipt.event_id, "Homeserver accepted message");

        Ok(receipt)
    }

    fn name(&self) -> &'static str {
        "matrix"
    }
}
