//! HTTP webhook triggers
//!
//! This module provides the webhook endpoints:
//! - `GET /get/{endpoint}` rendering against query parameters
//! - `POST /post/{endpoint}` rendering against the body (JSON) or query parameters

mod handlers;
mod models;
mod payload;

// Re-export handlers
pub use handlers::{get_webhook, post_webhook};

// Re-export models
pub use models::WebhookResponse;

// Re-export payload helpers
pub use payload::{body_lookup, first_values, query_lookup, RequestLookup};
