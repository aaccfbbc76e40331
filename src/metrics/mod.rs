//! Prometheus metrics for the webhook bridge.
//!
//! This module provides metrics for monitoring the bridge:
//! - Webhook request metrics (by endpoint and outcome)
//! - Template metrics (unresolved placeholders)
//! - Delivery metrics (sent, failed, latency)
//! - Config reload metrics

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics, ReloadMetrics, WebhookMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "bridge";

lazy_static! {
    // ============================================================================
    // Webhook Metrics
    // ============================================================================

    /// Webhook requests by endpoint, method and outcome
    pub static ref WEBHOOK_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_webhook_requests_total", METRIC_PREFIX),
        "Total webhook requests received",
        &["endpoint", "method", "outcome"]
    ).unwrap();

    /// Placeholders that rendered as the sentinel
    pub static ref PLACEHOLDERS_UNRESOLVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_placeholders_unresolved_total", METRIC_PREFIX),
        "Total template placeholders that could not be resolved",
        &["endpoint"]
    ).unwrap();

    /// Number of configured endpoints
    pub static ref ENDPOINTS_CONFIGURED: IntGauge = register_int_gauge!(
        format!("{}_endpoints_configured", METRIC_PREFIX),
        "Number of configured webhook endpoints"
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Messages accepted by the chat server
    pub static ref MESSAGES_DELIVERED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_messages_delivered_total", METRIC_PREFIX),
        "Total messages accepted by the chat server"
    ).unwrap();

    /// Delivery failures by reason
    pub static ref MESSAGES_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_failed_total", METRIC_PREFIX),
        "Total message delivery failures",
        &["reason"]
    ).unwrap();

    /// Delivery latency (request to homeserver response)
    pub static ref DELIVERY_LATENCY: Histogram = register_histogram!(
        format!("{}_delivery_latency_seconds", METRIC_PREFIX),
        "Message delivery latency in seconds",
        vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // ============================================================================
    // Config Reload Metrics
    // ============================================================================

    /// Config reloads by result
    pub static ref CONFIG_RELOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_config_reloads_total", METRIC_PREFIX),
        "Total configuration reload attempts",
        &["result"]
    ).unwrap();
}
