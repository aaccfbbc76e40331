use std::sync::Arc;
use std::time::Duration;

use config::ConfigError;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::config::{ConfigSource, MatrixConfig, ServerConfig, Settings};
use crate::endpoints::EndpointRegistry;
use crate::metrics::{ReloadMetrics, WebhookMetrics};

/// Quiet period after a file event before reloading; editors write in bursts
const RELOAD_DEBOUNCE_MS: u64 = 250;

/// Background task that reloads webhook endpoints when config files change.
///
/// Only the `webhooks` section is applied live. Server and chat settings are
/// read once at startup; changes to them are logged as needing a restart.
pub struct ConfigReloader {
    source: ConfigSource,
    registry: Arc<EndpointRegistry>,
    server: ServerConfig,
    matrix: MatrixConfig,
    shutdown: broadcast::Receiver<()>,
}

impl ConfigReloader {
    pub fn new(
        source: ConfigSource,
        registry: Arc<EndpointRegistry>,
        settings: &Settings,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            source,
            registry,
            server: settings.server.clone(),
            matrix: settings.matrix.clone(),
            shutdown,
        }
    }

    /// Watch the config directory until shutdown
    pub async fn run(mut self) {
        let (tx, mut rx) = mpsc::channel::<notify::Result<Event>>(16);

        let mut watcher = match notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        }) {
            Ok(watcher) => watcher,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create config watcher");
                return;
            }
        };

        // Watch the directory rather than the files; editors often replace files on save
        if let Err(e) = watcher.watch(&self.source.dir, RecursiveMode::NonRecursive) {
            tracing::error!(
                error = %e,
                dir = %self.source.dir.display(),
                "Failed to watch config directory"
            );
            return;
        }

        tracing::info!(dir = %self.source.dir.display(), "Config reloader started");

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Config reloader received shutdown signal");
                    break;
                }
                Some(res) = rx.recv() => match res {
                    Ok(event) if self.is_relevant(&event) => {
                        tokio::time::sleep(Duration::from_millis(RELOAD_DEBOUNCE_MS)).await;
                        while rx.try_recv().is_ok() {}

                        if let Err(e) = self.reload().await {
                            tracing::error!(error = %e, "Config reload failed, keeping previous endpoints");
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "Config watch error"),
                }
            }
        }

        tracing::info!("Config reloader stopped");
    }

    /// Whether a file event touches one of the loaded config files
    pub fn is_relevant(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
            && event.paths.iter().any(|p| self.source.is_config_file(p))
    }

    /// Re-read settings and swap the webhook section into the registry
    pub async fn reload(&mut self) -> Result<(), ConfigError> {
        let settings = match Settings::load(&self.source) {
            Ok(settings) => settings,
            Err(e) => {
                ReloadMetrics::record_failure();
                return Err(e);
            }
        };

        if settings.server != self.server || settings.matrix != self.matrix {
            tracing::warn!("Server or chat settings changed; restart to apply them");
        }

        let endpoints = settings.webhooks.endpoints.len();
        if let Err(e) = self.registry.replace(settings.webhooks).await {
            ReloadMetrics::record_failure();
            return Err(ConfigError::Message(e.to_string()));
        }

        ReloadMetrics::record_success();
        WebhookMetrics::set_endpoints(endpoints);
        tracing::info!(endpoints, "Configuration reloaded");
        Ok(())
    }
}
