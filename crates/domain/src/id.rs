//! Typed identifier for hub devices.
//!
//! The Smart Friends hub numbers its devices; the same numbering is used in
//! MQTT topics, so the identifier is a plain decimal integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a [`Device`](crate::device::Device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Wrap a raw hub identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw hub identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for DeviceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error returned when a topic segment is not a device identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a numeric device id")]
pub struct ParseDeviceIdError(String);

impl FromStr for DeviceId {
    type Err = ParseDeviceIdError;

    /// Accepts ASCII digits only: no sign, no whitespace, no exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseDeviceIdError(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseDeviceIdError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = DeviceId::new(12_345);
        let parsed: DeviceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_reject_empty_segment() {
        assert!(DeviceId::from_str("").is_err());
    }

    #[test]
    fn should_reject_signed_or_padded_numbers() {
        assert!(DeviceId::from_str("+12").is_err());
        assert!(DeviceId::from_str("-12").is_err());
        assert!(DeviceId::from_str(" 12").is_err());
        assert!(DeviceId::from_str("1e3").is_err());
    }

    #[test]
    fn should_reject_overflowing_number() {
        assert!(DeviceId::from_str("99999999999999999999999").is_err());
    }

    #[test]
    fn should_serialize_as_plain_number() {
        let json = serde_json::to_string(&DeviceId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
