//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `sfbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use sfbridge_adapter_mqtt::MqttConfig;
use sfbridge_adapter_virtual::VirtualHubConfig;
use sfbridge_domain::command::CommandMapping;
use sfbridge_domain::topic::TopicScheme;

/// Crates whose level `logging.debug` raises to `debug`.
const BRIDGE_TARGETS: [&str; 5] = [
    "sfbridged",
    "sfbridge_domain",
    "sfbridge_app",
    "sfbridge_adapter_mqtt",
    "sfbridge_adapter_virtual",
];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection.
    pub mqtt: MqttConfig,
    /// Payloads of the open / close / stop commands.
    pub payload: CommandMapping,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulated hub.
    pub hub: VirtualHubConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Log every bridge crate at `debug`, whatever `filter` says.
    pub debug: bool,
}

impl LoggingConfig {
    /// The filter directive to install.
    #[must_use]
    pub fn directives(&self) -> String {
        if !self.debug {
            return self.filter.clone();
        }
        let mut directives = self.filter.clone();
        for target in BRIDGE_TARGETS {
            if !directives.is_empty() {
                directives.push(',');
            }
            directives.push_str(target);
            directives.push_str("=debug");
        }
        directives
    }
}

impl Config {
    /// Load configuration from `sfbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sfbridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SFBRIDGE_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("SFBRIDGE_MQTT_PORT") {
            if let Ok(port) = val.parse() {
                self.mqtt.broker_port = port;
            }
        }
        if let Ok(val) = std::env::var("SFBRIDGE_MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Ok(val) = std::env::var("SFBRIDGE_MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }
        if let Ok(val) = std::env::var("SFBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "broker port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.client_id.is_empty() {
            return Err(ConfigError::Validation(
                "client id must not be empty".to_string(),
            ));
        }
        if let Err(err) = TopicScheme::new(&self.mqtt.base_topic) {
            return Err(ConfigError::Validation(format!(
                "base topic `{}`: {err}",
                self.mqtt.base_topic
            )));
        }
        Ok(())
    }

    /// Topic layout derived from the configured base topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the base topic is invalid.
    pub fn topics(&self) -> Result<TopicScheme, ConfigError> {
        TopicScheme::new(&self.mqtt.base_topic)
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            debug: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
