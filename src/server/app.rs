use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::api_routes;

use super::AppState;

pub fn create_app(state: AppState) -> Router {
    let max_body_bytes = state.settings.server.max_body_bytes;

    Router::new()
        // Merge API and webhook routes
        .merge(api_routes())
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        // The limit layer above replaces axum's default extractor limit
        .layer(DefaultBodyLimit::disable())
        // Add state
        .with_state(state)
}
