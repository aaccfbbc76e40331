use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::endpoints::WebhookConfig;

/// Directory searched for config files when `BRIDGE_CONFIG_DIR` is unset
pub const DEFAULT_CONFIG_DIR: &str = "config";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub otel: OtelConfig,
    #[serde(default)]
    pub webhooks: WebhookConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatrixConfig {
    /// Homeserver base URL, e.g. https://matrix.example.org
    #[serde(default = "default_homeserver")]
    pub homeserver: String,
    /// Access token of the bot account
    pub access_token: String,
    /// Request timeout in seconds
    #[serde(default = "default_matrix_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_homeserver() -> String {
    "http://localhost:8008".to_string()
}

fn default_matrix_timeout() -> u64 {
    10
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "webhook-bridge".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// Where settings are read from
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub dir: PathBuf,
    pub run_mode: String,
}

impl ConfigSource {
    pub fn new(dir: impl Into<PathBuf>, run_mode: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_mode: run_mode.into(),
        }
    }

    /// Resolve from `BRIDGE_CONFIG_DIR` and `RUN_MODE`
    pub fn from_env() -> Self {
        let dir = env::var("BRIDGE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::new(dir, run_mode)
    }

    /// File stems loaded in order: `default`, then the run mode
    pub fn file_stems(&self) -> [PathBuf; 2] {
        [self.dir.join("default"), self.dir.join(&self.run_mode)]
    }

    /// Whether a file inside the config directory is one we load
    pub fn is_config_file(&self, path: &Path) -> bool {
        if path.extension().is_none() {
            return false;
        }

        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem == "default" || stem == self.run_mode)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        Self::load(&ConfigSource::from_env())
    }

    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        let [default_stem, mode_stem] = source.file_stems();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.max_body_bytes", 1_048_576)?
            .set_default("matrix.homeserver", "http://localhost:8008")?
            .set_default("matrix.timeout_seconds", 10)?
            .set_default("webhooks.reload", true)?
            // Load config files if they exist
            .add_source(File::with_name(&default_stem.to_string_lossy()).required(false))
            .add_source(File::with_name(&mode_stem.to_string_lossy()).required(false))
            // Environment overrides, e.g. BRIDGE__MATRIX__ACCESS_TOKEN
            .add_source(
                Environment::with_prefix("BRIDGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("webhooks.tokens"),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;

        settings
            .webhooks
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(settings)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{PayloadFormat, TriggerMethod};
    use std::fs;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert_eq!(server.max_body_bytes, 1024 * 1024);

        let otel = OtelConfig::default();
        assert!(!otel.enabled);
        assert_eq!(otel.service_name, "webhook-bridge");
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[matrix]
homeserver = "https://matrix.example.org"
access_token = "bot-token"

[webhooks]
tokens = ["alpha", "beta"]

[webhooks.endpoints.deploy]
template = "Deployed ${app} to ${env}"
methods = ["GET", "POST"]
room_id = "!ops:example.org"
notice = true

[webhooks.endpoints.github]
template = "Push to ${repository.name}"
methods = ["POST"]
room_id = "!dev:example.org"
format = "JSON"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("testing.toml"),
            "[server]\nport = 9999\n",
        )
        .unwrap();

        let settings = Settings::load(&ConfigSource::new(dir.path(), "testing")).unwrap();

        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matrix.homeserver, "https://matrix.example.org");
        assert_eq!(settings.matrix.timeout_seconds, 10);
        assert_eq!(settings.webhooks.tokens, vec!["alpha", "beta"]);
        assert!(settings.webhooks.reload);

        let deploy = &settings.webhooks.endpoints["deploy"];
        assert!(deploy.notice);
        assert_eq!(deploy.format, PayloadFormat::Flat);
        assert_eq!(deploy.methods, vec![TriggerMethod::Get, TriggerMethod::Post]);

        let github = &settings.webhooks.endpoints["github"];
        assert_eq!(github.format, PayloadFormat::Json);
    }

    #[test]
    fn test_load_rejects_invalid_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[matrix]
access_token = "bot-token"

[webhooks.endpoints.empty]
template = "x"
methods = []
room_id = "!r:example.org"
"#,
        )
        .unwrap();

        let result = Settings::load(&ConfigSource::new(dir.path(), "testing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_mixed_case_endpoint_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[matrix]
access_token = "bot-token"

[webhooks.endpoints.DeployHook]
template = "v=${v}"
methods = ["GET"]
room_id = "!r:example.org"
"#,
        )
        .unwrap();

        let settings = Settings::load(&ConfigSource::new(dir.path(), "testing")).unwrap();

        assert!(settings.webhooks.endpoint("DeployHook").is_some());
        assert!(settings.webhooks.endpoint("deployhook").is_some());
    }

    #[test]
    fn test_is_config_file() {
        let source = ConfigSource::new("/etc/bridge", "production");
        assert!(source.is_config_file(Path::new("/etc/bridge/default.toml")));
        assert!(source.is_config_file(Path::new("/etc/bridge/production.yaml")));
        assert!(!source.is_config_file(Path::new("/etc/bridge/staging.toml")));
        assert!(!source.is_config_file(Path::new("/etc/bridge/default.toml.swp")));
        assert!(!source.is_config_file(Path::new("/etc/bridge/default")));
    }
}
