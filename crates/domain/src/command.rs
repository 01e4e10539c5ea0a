//! Cover commands and their hub payloads.
//!
//! The hub expects a device-specific value for open, close and stop. The
//! mapping is read from configuration once and never changes afterwards.

use std::fmt;

use serde::Deserialize;

use crate::error::{BridgeError, ValidationError};

/// A cover command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Stop,
}

impl Command {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
        }
    }

    /// Position the cover travels to after this command, as a topic payload.
    ///
    /// `0` is fully open, `100` fully closed. `Stop` has no target.
    #[must_use]
    pub fn target_position(self) -> Option<&'static str> {
        match self {
            Self::Open => Some("0"),
            Self::Close => Some("100"),
            Self::Stop => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload strings sent to / received from the hub for each [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCommandMapping")]
pub struct CommandMapping {
    open: String,
    close: String,
    stop: String,
}

impl CommandMapping {
    /// Create a mapping after checking that every payload is non-empty and
    /// that no two commands share a payload.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when a payload is empty or reused.
    pub fn new(
        open: impl Into<String>,
        close: impl Into<String>,
        stop: impl Into<String>,
    ) -> Result<Self, BridgeError> {
        let mapping = Self {
            open: open.into(),
            close: close.into(),
            stop: stop.into(),
        };
        mapping.validate()?;
        Ok(mapping)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for command in [Command::Open, Command::Close, Command::Stop] {
            if self.payload(command).is_empty() {
                return Err(ValidationError::EmptyPayload(command.as_str()));
            }
        }
        if self.open == self.close || self.open == self.stop {
            return Err(ValidationError::DuplicatePayload(self.open.clone()));
        }
        if self.close == self.stop {
            return Err(ValidationError::DuplicatePayload(self.close.clone()));
        }
        Ok(())
    }

    /// Payload configured for `command`.
    #[must_use]
    pub fn payload(&self, command: Command) -> &str {
        match command {
            Command::Open => &self.open,
            Command::Close => &self.close,
            Command::Stop => &self.stop,
        }
    }

    /// Reverse lookup: the command whose payload is byte-equal to `payload`.
    #[must_use]
    pub fn command_for(&self, payload: &str) -> Option<Command> {
        [Command::Open, Command::Close, Command::Stop]
            .into_iter()
            .find(|command| self.payload(*command) == payload)
    }
}

/// Shutter control values used by Schellenberg devices on Smart Friends hubs.
impl Default for CommandMapping {
    fn default() -> Self {
        Self {
            open: "1".to_string(),
            close: "2".to_string(),
            stop: "0".to_string(),
        }
    }
}

/// Configuration may give payloads as strings or bare scalars.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<RawPayload> for String {
    fn from(raw: RawPayload) -> Self {
        match raw {
            RawPayload::Text(text) => text,
            RawPayload::Integer(value) => value.to_string(),
            RawPayload::Float(value) => value.to_string(),
            RawPayload::Bool(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawCommandMapping {
    open: RawPayload,
    close: RawPayload,
    stop: RawPayload,
}

impl TryFrom<RawCommandMapping> for CommandMapping {
    type Error = ValidationError;

    fn try_from(raw: RawCommandMapping) -> Result<Self, Self::Error> {
        let mapping = Self {
            open: raw.open.into(),
            close: raw.close.into(),
            stop: raw.stop.into(),
        };
        mapping.validate()?;
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_look_up_command_by_payload() {
        let mapping = CommandMapping::new("50", "0", "25").unwrap();
        assert_eq!(mapping.command_for("50"), Some(Command::Open));
        assert_eq!(mapping.command_for("0"), Some(Command::Close));
        assert_eq!(mapping.command_for("25"), Some(Command::Stop));
        assert_eq!(mapping.command_for("\"50\""), None);
    }

    #[test]
    fn should_reject_duplicate_payloads() {
        let result = CommandMapping::new("1", "1", "0");
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::DuplicatePayload(p))) if p == "1"
        ));
    }

    #[test]
    fn should_reject_empty_payload() {
        let result = CommandMapping::new("1", "2", "");
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::EmptyPayload("stop")))
        ));
    }

    #[test]
    fn should_default_to_schellenberg_shutter_values() {
        let mapping = CommandMapping::default();
        assert_eq!(mapping.payload(Command::Open), "1");
        assert_eq!(mapping.payload(Command::Close), "2");
        assert_eq!(mapping.payload(Command::Stop), "0");
    }

    #[test]
    fn should_deserialize_strings_and_numbers_from_toml() {
        let toml = r#"
            open = "up"
            close = 2
            stop = 0
        "#;
        let mapping: CommandMapping = toml::from_str(toml).unwrap();
        assert_eq!(mapping.payload(Command::Open), "up");
        assert_eq!(mapping.payload(Command::Close), "2");
        assert_eq!(mapping.payload(Command::Stop), "0");
    }

    #[test]
    fn should_fail_deserializing_duplicate_payloads() {
        let toml = r#"
            open = "1"
            close = 1
            stop = 0
        "#;
        let result: Result<CommandMapping, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_target_endpoints_for_open_and_close() {
        assert_eq!(Command::Open.target_position(), Some("0"));
        assert_eq!(Command::Close.target_position(), Some("100"));
        assert_eq!(Command::Stop.target_position(), None);
    }
}
