//! Endpoint types and error definitions

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint-specific error type
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Invalid endpoint name: {0}")]
    InvalidName(String),

    #[error("Invalid endpoint {name}: {reason}")]
    InvalidEndpoint { name: String, reason: String },
}

/// Result type for endpoint operations
pub type EndpointResult<T> = Result<T, EndpointError>;

/// Canonical form of an endpoint name.
///
/// Config sources lowercase their keys, so endpoint names are matched
/// case-insensitively everywhere.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// HTTP methods an endpoint may be triggered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerMethod {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
}

impl fmt::Display for TriggerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMethod::Get => write!(f, "GET"),
            TriggerMethod::Post => write!(f, "POST"),
        }
    }
}

/// How a request payload is interpreted for placeholder lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Single-level lookup in query parameters
    #[default]
    #[serde(alias = "query", alias = "FLAT")]
    Flat,
    /// Dotted-path lookup in a JSON request body
    #[serde(alias = "JSON")]
    Json,
}

/// A single named webhook endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Message template with `${key}` placeholders
    pub template: String,

    /// Allowed trigger methods
    #[serde(default)]
    pub methods: Vec<TriggerMethod>,

    /// Destination room identifier
    pub room_id: String,

    /// Send as a notice instead of a regular text message
    #[serde(default)]
    pub notice: bool,

    /// Payload format for POST triggers
    #[serde(default)]
    pub format: PayloadFormat,
}

impl EndpointConfig {
    pub fn allows(&self, method: TriggerMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Validate the endpoint definition
    pub fn validate(&self, name: &str) -> EndpointResult<()> {
        let invalid = |reason: &str| EndpointError::InvalidEndpoint {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if self.template.is_empty() {
            return Err(invalid("template must not be empty"));
        }

        if self.room_id.trim().is_empty() {
            return Err(invalid("room_id must not be empty"));
        }

        if self.methods.is_empty() {
            return Err(invalid("at least one method is required"));
        }

        Ok(())
    }
}

/// Tokens and endpoint definitions, the reloadable part of the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared-secret tokens accepted on every endpoint
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Endpoints keyed by the name used in the request path, see [`normalize_name`]
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointConfig>,

    /// Watch the config directory and reload on change
    #[serde(default = "default_reload")]
    pub reload: bool,
}

fn default_reload() -> bool {
    true
}

impl WebhookConfig {
    /// Rekey endpoints by their canonical names
    pub fn normalized(mut self) -> Self {
        self.endpoints = self
            .endpoints
            .into_iter()
            .map(|(name, endpoint)| (normalize_name(&name), endpoint))
            .collect();
        self
    }

    /// Get an endpoint by name, in any case
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(&normalize_name(name))
    }

    pub fn is_valid_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == token)
    }

    /// Validate every endpoint and its name
    pub fn validate(&self) -> EndpointResult<()> {
        let mut seen = HashSet::with_capacity(self.endpoints.len());

        for (name, endpoint) in &self.endpoints {
            if !seen.insert(normalize_name(name)) {
                return Err(EndpointError::InvalidName(format!(
                    "{name}: differs from another endpoint only by case"
                )));
            }

            if name.is_empty() || name.len() > 64 {
                return Err(EndpointError::InvalidName(
                    "Name must be 1-64 characters".to_string(),
                ));
            }

            if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
                return Err(EndpointError::InvalidName(format!(
                    "{name}: only alphanumeric, dash, or underscore allowed"
                )));
            }

            endpoint.validate(name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EndpointConfig {
        EndpointConfig {
            template: "Hello ${name}".to_string(),
            methods: vec![TriggerMethod::Get],
            room_id: "!room:example.org".to_string(),
            notice: false,
            format: PayloadFormat::Flat,
        }
    }

    #[test]
    fn test_endpoint_validation_valid() {
        assert!(endpoint().validate("hello").is_ok());
    }

    #[test]
    fn test_endpoint_validation_empty_template() {
        let mut ep = endpoint();
        ep.template = String::new();
        assert!(matches!(
            ep.validate("hello"),
            Err(EndpointError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_endpoint_validation_no_methods() {
        let mut ep = endpoint();
        ep.methods.clear();
        assert!(ep.validate("hello").is_err());
    }

    #[test]
    fn test_webhook_config_invalid_name() {
        let mut config = WebhookConfig::default();
        config.endpoints.insert("bad/name".to_string(), endpoint());
        assert!(matches!(
            config.validate(),
            Err(EndpointError::InvalidName(_))
        ));
    }

    #[test]
    fn test_names_match_in_any_case() {
        let mut config = WebhookConfig::default();
        config.endpoints.insert("DeployHook".to_string(), endpoint());
        let config = config.normalized();

        assert!(config.endpoints.contains_key("deployhook"));
        assert!(config.endpoint("DeployHook").is_some());
        assert!(config.endpoint("DEPLOYHOOK").is_some());
        assert!(config.endpoint("deploy").is_none());
    }

    #[test]
    fn test_webhook_config_case_collision() {
        let mut config = WebhookConfig::default();
        config.endpoints.insert("Deploy".to_string(), endpoint());
        config.endpoints.insert("deploy".to_string(), endpoint());
        assert!(matches!(
            config.validate(),
            Err(EndpointError::InvalidName(_))
        ));
    }

    #[test]
    fn test_allows() {
        let ep = endpoint();
        assert!(ep.allows(TriggerMethod::Get));
        assert!(!ep.allows(TriggerMethod::Post));
    }

    #[test]
    fn test_deserialize_aliases() {
        let ep: EndpointConfig = serde_json::from_value(serde_json::json!({
            "template": "x",
            "methods": ["get", "POST"],
            "room_id": "!r:h",
            "format": "JSON"
        }))
        .unwrap();

        assert_eq!(ep.methods, vec![TriggerMethod::Get, TriggerMethod::Post]);
        assert_eq!(ep.format, PayloadFormat::Json);
        assert!(!ep.notice);

        let ep: EndpointConfig = serde_json::from_value(serde_json::json!({
            "template": "x",
            "methods": ["GET"],
            "room_id": "!r:h"
        }))
        .unwrap();
        assert_eq!(ep.format, PayloadFormat::Flat);
    }
}
