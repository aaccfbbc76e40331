mod settings;

pub use settings::{
    ConfigSource, MatrixConfig, OtelConfig, ServerConfig, Settings, DEFAULT_CONFIG_DIR,
};
