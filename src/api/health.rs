use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::endpoints::EndpointStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Names of the currently configured endpoints
    pub endpoints: Vec<String>,
    /// Counters for endpoints that have received traffic
    pub traffic: HashMap<String, EndpointStatsSnapshot>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        endpoints: state.registry.names().await,
        traffic: state.stats.snapshot(),
    })
}
