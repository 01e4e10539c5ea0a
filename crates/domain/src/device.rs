//! Device — a single addressable unit reported by the hub.
//!
//! A physical cover is exposed by the hub as several devices sharing one
//! `master_device_id`: a switch (`"Schalter"`) that accepts open/close/stop
//! commands and a position sensor (`"Position"`) reporting 0–100.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, ValidationError};
use crate::id::DeviceId;

/// Hub device name of a switch / cover control unit.
pub const SWITCH_DEVICE_NAME: &str = "Schalter";

/// Hub device name of a cover position sensor.
pub const POSITION_DEVICE_NAME: &str = "Position";

/// Full registry snapshot keyed by device id.
pub type DeviceMap = HashMap<DeviceId, Device>;

/// Role of a device, derived from its hub `device_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    /// Cover control unit (`"Schalter"`).
    Switch,
    /// Cover position sensor (`"Position"`).
    Position,
    Other,
}

/// Device metadata as reported by the hub on discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub device_name: String,
    pub master_device_id: Option<DeviceId>,
    pub master_device_name: Option<String>,
    pub device_designation: Option<String>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Role of this device within its master group.
    #[must_use]
    pub fn role(&self) -> DeviceRole {
        match self.device_name.as_str() {
            SWITCH_DEVICE_NAME => DeviceRole::Switch,
            POSITION_DEVICE_NAME => DeviceRole::Position,
            _ => DeviceRole::Other,
        }
    }

    /// Whether `self` belongs to the given master group.
    ///
    /// Devices without a master never match, not even each other.
    #[must_use]
    pub fn is_sibling_of(&self, master_device_id: Option<DeviceId>) -> bool {
        master_device_id.is_some() && self.master_device_id == master_device_id
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when `device_name` is empty.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.device_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    device_name: Option<String>,
    master_device_id: Option<DeviceId>,
    master_device_name: Option<String>,
    device_designation: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn master_device_id(mut self, id: impl Into<DeviceId>) -> Self {
        self.master_device_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn master_device_name(mut self, name: impl Into<String>) -> Self {
        self.master_device_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_designation(mut self, designation: impl Into<String>) -> Self {
        self.device_designation = Some(designation.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// A missing id defaults to `0`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if `device_name` is missing or empty.
    pub fn build(self) -> Result<Device, BridgeError> {
        let device = Device {
            id: self.id.unwrap_or(DeviceId::new(0)),
            device_name: self.device_name.unwrap_or_default(),
            master_device_id: self.master_device_id,
            master_device_name: self.master_device_name,
            device_designation: self.device_designation,
        };
        device.validate()?;
        Ok(device)
    }
}
