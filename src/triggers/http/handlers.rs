//! Webhook trigger handlers

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;

use crate::auth::{authorize, extract_token};
use crate::delivery::{MessageKind, OutgoingMessage};
use crate::endpoints::{normalize_name, EndpointConfig, TriggerMethod};
use crate::error::{AppError, Result};
use crate::metrics::{DeliveryMetrics, WebhookMetrics};
use crate::server::AppState;
use crate::template::{render_detailed, Lookup};

use super::models::WebhookResponse;
use super::payload::{body_lookup, first_values, query_lookup};

/// Label used for requests to endpoints that do not exist
const UNKNOWN_ENDPOINT: &str = "_unknown";

/// GET /get/{endpoint} - trigger with query parameters as the payload
#[tracing::instrument(name = "http.webhook_get", skip_all, fields(endpoint = %name))]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Json<WebhookResponse>> {
    tracing::info!("Received webhook");

    let name = normalize_name(&name);
    let result = handle_get(&state, &name, first_values(query), &headers).await;

    record_outcome(&state, &name, TriggerMethod::Get, &result);
    result.map(Json)
}

/// POST /post/{endpoint} - trigger with the request body as the payload
#[tracing::instrument(name = "http.webhook_post", skip_all, fields(endpoint = %name))]
pub async fn post_webhook(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    tracing::info!(body_bytes = body.len(), "Received webhook");

    let name = normalize_name(&name);
    let result = handle_post(&state, &name, first_values(query), &headers, &body).await;

    record_outcome(&state, &name, TriggerMethod::Post, &result);
    result.map(Json)
}

async fn handle_get(
    state: &AppState,
    name: &str,
    query: HashMap<String, String>,
    headers: &HeaderMap,
) -> Result<WebhookResponse> {
    let endpoint = admit(state, name, TriggerMethod::Get, extract_token(&query, headers)).await?;
    let lookup = query_lookup(query);
    render_and_deliver(state, name, &endpoint, lookup.as_ref()).await
}

async fn handle_post(
    state: &AppState,
    name: &str,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookResponse> {
    let endpoint = admit(state, name, TriggerMethod::Post, extract_token(&query, headers)).await?;
    let lookup = body_lookup(endpoint.format, query, body)?;
    render_and_deliver(state, name, &endpoint, lookup.as_ref()).await
}

/// Resolve the endpoint, then check token and method, all against one snapshot
async fn admit(
    state: &AppState,
    name: &str,
    method: TriggerMethod,
    token: Option<&str>,
) -> Result<EndpointConfig> {
    let config = state.registry.snapshot().await;

    let Some(endpoint) = config.endpoint(name).cloned() else {
        return Err(AppError::NotFound(format!("Endpoint {name} does not exist")));
    };
    state.stats.record(name, |s| s.record_received());

    if let Err(e) = authorize(&config, token) {
        tracing::warn!("Endpoint called with invalid token");
        return Err(e);
    }

    if !endpoint.allows(method) {
        return Err(AppError::Forbidden(format!(
            "Endpoint {name} may not receive {method} requests"
        )));
    }

    Ok(endpoint)
}

/// Render the endpoint template against the lookup and make one delivery attempt
async fn render_and_deliver(
    state: &AppState,
    name: &str,
    endpoint: &EndpointConfig,
    lookup: &(dyn Lookup + Send + Sync),
) -> Result<WebhookResponse> {
    let rendered = render_detailed(&endpoint.template, lookup);

    if !rendered.unresolved.is_empty() {
        tracing::warn!(
            unresolved = ?rendered.unresolved,
            "Unknown or invalid template keys"
        );
        state
            .stats
            .record(name, |s| s.record_unresolved(rendered.unresolved.len()));
        WebhookMetrics::record_unresolved(name, rendered.unresolved.len());
    }

    let message = OutgoingMessage::new(
        endpoint.room_id.clone(),
        rendered.text,
        MessageKind::from_notice(endpoint.notice),
    );

    let started = Instant::now();
    match state.sender.send(&message).await {
        Ok(receipt) => {
            DeliveryMetrics::record_delivered(started.elapsed());
            tracing::info!(
                room_id = %message.room_id,
                event_id = %receipt.event_id,
                sender = state.sender.name(),
                "Message delivered"
            );

            Ok(WebhookResponse {
                endpoint: name.to_string(),
                room_id: message.room_id,
                event_id: receipt.event_id,
                unresolved: rendered.unresolved,
                timestamp: Utc::now(),
            })
        }
        Err(e) => {
            DeliveryMetrics::record_failed(&e, started.elapsed());
            tracing::debug!(body = %message.body, "Undelivered message");
            Err(AppError::Delivery(e))
        }
    }
}

fn record_outcome(
    state: &AppState,
    name: &str,
    method: TriggerMethod,
    result: &Result<WebhookResponse>,
) {
    let outcome = match result {
        Ok(_) => "delivered",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::Forbidden(_)) => "forbidden",
        Err(AppError::Validation(_)) => "invalid_payload",
        Err(AppError::Delivery(_)) => "delivery_failed",
        Err(_) => "error",
    };

    match result {
        Ok(_) => state.stats.record(name, |s| s.record_delivered()),
        Err(AppError::Forbidden(_)) => state.stats.record(name, |s| s.record_rejected()),
        Err(AppError::Delivery(_)) => state.stats.record(name, |s| s.record_failed()),
        Err(_) => {}
    }

    let label = match result {
        Err(AppError::NotFound(_)) => UNKNOWN_ENDPOINT,
        _ => name,
    };
    WebhookMetrics::record_request(label, &method.to_string(), outcome);
}
