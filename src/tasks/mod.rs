mod config_reload;

pub use config_reload::ConfigReloader;
