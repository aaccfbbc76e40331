use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::{get_webhook, post_webhook};

use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health, Stats & Metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Webhook triggers
        .route("/get/{endpoint}", get(get_webhook))
        .route("/post/{endpoint}", post(post_webhook))
}
