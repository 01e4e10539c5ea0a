//! Hub events — what the Smart Friends hub reports to the bridge.

use crate::device::Device;
use crate::id::DeviceId;
use crate::value::DeviceValue;

/// A device value changed on the hub.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceUpdate {
    pub device_id: DeviceId,
    pub master_device_id: Option<DeviceId>,
    pub value: DeviceValue,
    /// Set when `value` is a continuous position in percent (0–100).
    pub float_value: bool,
}

impl DeviceUpdate {
    /// A plain value change.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        master_device_id: Option<DeviceId>,
        value: impl Into<DeviceValue>,
    ) -> Self {
        Self {
            device_id,
            master_device_id,
            value: value.into(),
            float_value: false,
        }
    }

    /// A position report.
    #[must_use]
    pub fn position(
        device_id: DeviceId,
        master_device_id: Option<DeviceId>,
        value: impl Into<DeviceValue>,
    ) -> Self {
        Self {
            float_value: true,
            ..Self::new(device_id, master_device_id, value)
        }
    }

    /// `true` if the position report sits on an end stop (0 or 100).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_at_end_stop(&self) -> bool {
        self.float_value
            && self
                .value
                .as_f64()
                .is_some_and(|position| position == 0.0 || position == 100.0)
    }
}

/// Events emitted by the hub.
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    /// The hub announced a device. The registry should be refreshed.
    DeviceDiscovered(Device),
    /// A device reported a new value.
    ValueChanged(DeviceUpdate),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_detect_end_stops_for_position_reports() {
        let master = Some(DeviceId::new(100));
        assert!(DeviceUpdate::position(DeviceId::new(102), master, 0_i64).is_at_end_stop());
        assert!(DeviceUpdate::position(DeviceId::new(102), master, 100_i64).is_at_end_stop());
        assert!(!DeviceUpdate::position(DeviceId::new(102), master, 50_i64).is_at_end_stop());
    }

    #[test]
    fn should_not_treat_plain_updates_as_end_stops() {
        let update = DeviceUpdate::new(DeviceId::new(101), None, 100_i64);
        assert!(!update.is_at_end_stop());
    }

    #[test]
    fn should_not_coerce_string_positions() {
        let update = DeviceUpdate::position(DeviceId::new(102), None, "100");
        assert!(!update.is_at_end_stop());
    }

    #[test]
    fn should_accept_float_end_stop() {
        let update = DeviceUpdate::position(
            DeviceId::new(102),
            None,
            serde_json::Number::from_f64(100.0).unwrap(),
        );
        assert!(update.is_at_end_stop());
    }
}
