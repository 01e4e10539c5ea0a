//! MQTT broker connection configuration.

use serde::Deserialize;

use sfbridge_domain::topic::DEFAULT_BASE_TOPIC;

/// Configuration for the broker connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Optional username for broker authentication.
    pub username: Option<String>,
    /// Optional password, only used together with `username`.
    pub password: Option<String>,
    /// First topic level of every bridge topic.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Pause after a connection error before the next attempt, in seconds.
    pub reconnect_delay_secs: u16,
    /// Number of outgoing requests that may be queued before publishing fails.
    pub request_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "sfbridge".to_string(),
            username: None,
            password: None,
            base_topic: DEFAULT_BASE_TOPIC.to_string(),
            keep_alive_secs: 30,
            reconnect_delay_secs: 5,
            request_capacity: 64,
        }
    }
}
