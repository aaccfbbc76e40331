//! Live endpoint registry with atomic reload

use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::{EndpointConfig, EndpointResult, WebhookConfig};

/// Holds the current tokens and endpoint definitions.
///
/// Readers get an `Arc` snapshot, so a request keeps a consistent view even if a
/// reload swaps the configuration while it is in flight.
pub struct EndpointRegistry {
    current: RwLock<Arc<WebhookConfig>>,
}

impl EndpointRegistry {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config.normalized())),
        }
    }

    /// Current configuration snapshot
    pub async fn snapshot(&self) -> Arc<WebhookConfig> {
        self.current.read().await.clone()
    }

    /// Get an endpoint by name, matched case-insensitively
    pub async fn get(&self, name: &str) -> Option<EndpointConfig> {
        self.current.read().await.endpoint(name).cloned()
    }

    /// Check a request token against the configured token list
    pub async fn is_valid_token(&self, token: &str) -> bool {
        self.current.read().await.is_valid_token(token)
    }

    /// Validate and swap in a new configuration
    pub async fn replace(&self, config: WebhookConfig) -> EndpointResult<()> {
        config.validate()?;
        let config = config.normalized();

        let endpoints = config.endpoints.len();
        let tokens = config.tokens.len();
        *self.current.write().await = Arc::new(config);

        tracing::info!(endpoints, tokens, "Endpoint registry updated");
        Ok(())
    }

    /// Sorted endpoint names
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .current
            .read()
            .await
            .endpoints
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of configured endpoints
    pub async fn len(&self) -> usize {
        self.current.read().await.endpoints.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{PayloadFormat, TriggerMethod};

    fn config_with(names: &[&str], tokens: &[&str]) -> WebhookConfig {
        let mut config = WebhookConfig {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        for name in names {
            config.endpoints.insert(
                name.to_string(),
                EndpointConfig {
                    template: format!("{name}: ${{msg}}"),
                    methods: vec![TriggerMethod::Get, TriggerMethod::Post],
                    room_id: "!room:example.org".to_string(),
                    notice: false,
                    format: PayloadFormat::Flat,
                },
            );
        }
        config
    }

    #[tokio::test]
    async fn test_get_and_tokens() {
        let registry = EndpointRegistry::new(config_with(&["deploy"], &["secret"]));

        assert!(registry.get("deploy").await.is_some());
        assert!(registry.get("missing").await.is_none());
        assert!(registry.is_valid_token("secret").await);
        assert!(!registry.is_valid_token("wrong").await);
        assert!(!registry.is_valid_token("").await);
    }

    #[tokio::test]
    async fn test_replace() {
        let registry = EndpointRegistry::new(config_with(&["old"], &["t1"]));
        let before = registry.snapshot().await;

        registry
            .replace(config_with(&["new-a", "new-b"], &["t2"]))
            .await
            .unwrap();

        assert_eq!(registry.names().await, vec!["new-a", "new-b"]);
        assert!(!registry.is_valid_token("t1").await);
        assert!(registry.is_valid_token("t2").await);
        // Old snapshot is unaffected
        assert!(before.endpoints.contains_key("old"));
    }

    #[tokio::test]
    async fn test_mixed_case_names() {
        let registry = EndpointRegistry::new(config_with(&["DeployHook"], &["t"]));

        assert_eq!(registry.names().await, vec!["deployhook"]);
        assert!(registry.get("DeployHook").await.is_some());
        assert!(registry.get("deployhook").await.is_some());

        registry
            .replace(config_with(&["BuildStatus"], &["t"]))
            .await
            .unwrap();
        assert!(registry.get("buildstatus").await.is_some());
        assert!(registry.get("BUILDSTATUS").await.is_some());
    }

    #[tokio::test]
    async fn test_replace_rejects_invalid() {
        let registry = EndpointRegistry::new(config_with(&["keep"], &["t"]));

        let mut bad = config_with(&["broken"], &["t"]);
        bad.endpoints.get_mut("broken").unwrap().room_id = String::new();

        assert!(registry.replace(bad).await.is_err());
        assert_eq!(registry.names().await, vec!["keep"]);
        assert_eq!(registry.len().await, 1);
    }
}
