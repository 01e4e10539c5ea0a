//! Device values and the MQTT payload codec.
//!
//! Hub values are booleans, numbers or strings. On the wire they travel as
//! JSON scalars, but payloads that are not valid JSON are still accepted and
//! treated as plain strings. Neither direction ever fails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single typed device value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl DeviceValue {
    /// Decode an MQTT payload into a hub value.
    ///
    /// JSON scalars are decoded to their typed variant. Anything else
    /// (invalid JSON, `null`, arrays, objects) is kept verbatim as a string.
    #[must_use]
    pub fn decode(payload: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(payload) {
            Ok(serde_json::Value::Bool(value)) => Self::Bool(value),
            Ok(serde_json::Value::Number(value)) => Self::Number(value),
            Ok(serde_json::Value::String(value)) => Self::String(value),
            _ => Self::String(String::from_utf8_lossy(payload).into_owned()),
        }
    }

    /// Encode the value as an MQTT payload.
    ///
    /// Uses the JSON form, so strings come out quoted. Falls back to the
    /// plain textual form if serialization fails.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }

    /// `true` for the empty string, which the hub uses as "no value".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::String(value) if value.is_empty())
    }

    /// Numeric view of the value. Strings are not coerced.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Number(value) => value.fmt(f),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for DeviceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DeviceValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for DeviceValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<serde_json::Number> for DeviceValue {
    fn from(value: serde_json::Number) -> Self {
        Self::Number(value)
    }
}

impl From<String> for DeviceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for DeviceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
