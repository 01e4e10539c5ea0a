//! Device registry — the bridge's view of the hub's devices.
//!
//! Readers take an [`Arc`] snapshot; discovery swaps in a whole new map.
//! A reader therefore never sees a half-replaced registry.

use std::sync::{Arc, PoisonError, RwLock};

use sfbridge_domain::device::{Device, DeviceMap};
use sfbridge_domain::id::DeviceId;

/// Read-mostly registry with snapshot-swap semantics.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<Arc<DeviceMap>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Later replacements do not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DeviceMap> {
        let guard = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the whole registry. Nothing from the previous map is kept.
    pub fn replace(&self, devices: impl IntoIterator<Item = Device>) {
        let map: DeviceMap = devices
            .into_iter()
            .map(|device| (device.id, device))
            .collect();
        let mut guard = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(map);
    }

    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<Device> {
        self.snapshot().get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: u64, name: &str) -> Device {
        Device::builder()
            .id(id)
            .device_name(name)
            .master_device_id(100)
            .build()
            .unwrap()
    }

    #[test]
    fn should_start_empty() {
        let registry = DeviceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(DeviceId::new(1)).is_none());
    }

    #[test]
    fn should_replace_instead_of_merge() {
        let registry = DeviceRegistry::new();
        registry.replace([device(101, "Schalter"), device(102, "Position")]);
        assert_eq!(registry.len(), 2);

        registry.replace([device(201, "Schalter")]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(DeviceId::new(101)).is_none());
        assert_eq!(
            registry.get(DeviceId::new(201)).map(|d| d.device_name),
            Some("Schalter".to_string())
        );
    }

    #[test]
    fn should_keep_old_snapshot_stable_across_replace() {
        let registry = DeviceRegistry::new();
        registry.replace([device(101, "Schalter")]);
        let before = registry.snapshot();

        registry.replace([device(202, "Position"), device(203, "Position")]);

        assert_eq!(before.len(), 1);
        assert!(before.contains_key(&DeviceId::new(101)));
        assert_eq!(registry.snapshot().len(), 2);
    }
}
