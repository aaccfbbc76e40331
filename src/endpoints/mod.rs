//! Webhook endpoint definitions.
//!
//! This module provides:
//! - Endpoint and token configuration types
//! - A live registry that can be swapped atomically on config reload
//! - Per-endpoint request counters

mod registry;
mod stats;
mod types;

pub use registry::EndpointRegistry;
pub use stats::{EndpointStats, EndpointStatsSnapshot, StatsTracker};
pub use types::{
    normalize_name, EndpointConfig, EndpointError, EndpointResult, PayloadFormat, TriggerMethod,
    WebhookConfig,
};
