use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Log levels accepted by [`LoggingConfig::level`]
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by [`LoggingConfig::format`]
pub const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LifecycleConfig {
    /// Name shown in lifecycle log lines
    #[serde(default = "default_name")]
    pub name: String,

    /// Stop the lifecycle automatically on SIGINT/SIGTERM and process exit
    #[serde(default = "default_install_shutdown_hook")]
    pub install_shutdown_hook: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level applied when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: pretty, compact or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LifecycleConfig {
    /// Load configuration from defaults, an optional TOML file and
    /// `LIFECYCLE_*` environment variables (nested keys use `__`, e.g.
    /// `LIFECYCLE_LOGGING__LEVEL`), in increasing precedence.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        info!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("name", default_name())?
            .set_default("install_shutdown_hook", default_install_shutdown_hook())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            .add_source(
                Environment::with_prefix("LIFECYCLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: LifecycleConfig = settings.try_deserialize()?;
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Message(
                "Lifecycle name must not be empty or blank".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Message(format!(
                "Unknown log level '{}', expected one of {:?}",
                self.logging.level, LOG_LEVELS
            )));
        }

        if !LOG_FORMATS.contains(&self.logging.format.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Message(format!(
                "Unknown log format '{}', expected one of {:?}",
                self.logging.format, LOG_FORMATS
            )));
        }

        Ok(())
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            install_shutdown_hook: default_install_shutdown_hook(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_name() -> String {
    "anonymous".to_string()
}
fn default_install_shutdown_hook() -> bool {
    false
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
