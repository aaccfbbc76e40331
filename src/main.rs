use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use webhook_bridge::config::{ConfigSource, Settings};
use webhook_bridge::server::{create_app, AppState};
use webhook_bridge::shutdown::shutdown_signal;
use webhook_bridge::tasks::ConfigReloader;
use webhook_bridge::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!(
        endpoints = settings.webhooks.endpoints.len(),
        tokens = settings.webhooks.tokens.len(),
        "Configuration loaded"
    );

    // Create application state
    let state = AppState::new(settings.clone())?;
    tracing::info!(sender = state.sender.name(), "Application state initialized");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Start config reloader in background
    let reload_handle = if settings.webhooks.reload {
        let reloader = ConfigReloader::new(
            ConfigSource::from_env(),
            state.registry.clone(),
            &settings,
            shutdown_tx.subscribe(),
        );
        Some(tokio::spawn(reloader.run()))
    } else {
        None
    };

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    // Wait for background tasks to finish
    if let Some(handle) = reload_handle {
        tracing::info!("Waiting for background tasks to finish...");
        let _ = handle.await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}
