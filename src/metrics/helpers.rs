//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    CONFIG_RELOADS_TOTAL, DELIVERY_LATENCY, ENDPOINTS_CONFIGURED, MESSAGES_DELIVERED_TOTAL,
    MESSAGES_FAILED_TOTAL, PLACEHOLDERS_UNRESOLVED_TOTAL, WEBHOOK_REQUESTS_TOTAL,
};
use crate::delivery::DeliveryError;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording webhook request metrics
pub struct WebhookMetrics;

impl WebhookMetrics {
    /// Record a finished webhook request
    pub fn record_request(endpoint: &str, method: &str, outcome: &str) {
        WEBHOOK_REQUESTS_TOTAL
            .with_label_values(&[endpoint, method, outcome])
            .inc();
    }

    /// Record placeholders rendered as the sentinel
    pub fn record_unresolved(endpoint: &str, count: usize) {
        if count > 0 {
            PLACEHOLDERS_UNRESOLVED_TOTAL
                .with_label_values(&[endpoint])
                .inc_by(count as u64);
        }
    }

    /// Update configured endpoint count
    pub fn set_endpoints(count: usize) {
        ENDPOINTS_CONFIGURED.set(count as i64);
    }
}

/// Helper struct for recording delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_delivered(latency: Duration) {
        MESSAGES_DELIVERED_TOTAL.inc();
        DELIVERY_LATENCY.observe(latency.as_secs_f64());
    }

    pub fn record_failed(error: &DeliveryError, latency: Duration) {
        let reason = match error {
            DeliveryError::InvalidHomeserver(_) => "config",
            DeliveryError::Http(_) => "transport",
            DeliveryError::Rejected { .. } => "rejected",
        };
        MESSAGES_FAILED_TOTAL.with_label_values(&[reason]).inc();
        DELIVERY_LATENCY.observe(latency.as_secs_f64());
    }
}

/// Helper struct for recording config reload metrics
pub struct ReloadMetrics;

impl ReloadMetrics {
    pub fn record_success() {
        CONFIG_RELOADS_TOTAL.with_label_values(&["success"]).inc();
    }

    pub fn record_failure() {
        CONFIG_RELOADS_TOTAL.with_label_values(&["failure"]).inc();
    }
}
