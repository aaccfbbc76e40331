use std::sync::Arc;

use crate::config::Settings;
use crate::delivery::{DeliveryError, MatrixSender, MessageSender};
use crate::endpoints::{EndpointRegistry, StatsTracker};
use crate::metrics::WebhookMetrics;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<EndpointRegistry>,
    pub sender: Arc<dyn MessageSender>,
    pub stats: Arc<StatsTracker>,
}

impl AppState {
    /// Build state with a Matrix sender from the settings
    pub fn new(settings: Settings) -> Result<Self, DeliveryError> {
        let sender = Arc::new(MatrixSender::new(&settings.matrix)?);
        Ok(Self::with_sender(settings, sender))
    }

    /// Build state around an existing sender
    pub fn with_sender(settings: Settings, sender: Arc<dyn MessageSender>) -> Self {
        let registry = Arc::new(EndpointRegistry::new(settings.webhooks.clone()));
        WebhookMetrics::set_endpoints(settings.webhooks.endpoints.len());

        Self {
            settings: Arc::new(settings),
            registry,
            sender,
            stats: Arc::new(StatsTracker::new()),
        }
    }
}
