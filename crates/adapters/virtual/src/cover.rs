//! Virtual cover — a motorized shutter exposed as a master group with a
//! `"Schalter"` and a `"Position"` device.
//!
//! Position 0 is fully open, 100 fully closed. While travelling the cover
//! reports its position every 10 %.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sfbridge_domain::device::{Device, POSITION_DEVICE_NAME, SWITCH_DEVICE_NAME};
use sfbridge_domain::error::BridgeError;
use sfbridge_domain::event::{DeviceUpdate, HubEvent};
use sfbridge_domain::id::DeviceId;

const STEP: u8 = 10;

/// A simulated cover.
///
/// Device ids are derived from the cover's index: the master is `index * 100`,
/// the switch `index * 100 + 1` and the position sensor `index * 100 + 2`.
pub struct VirtualCover {
    index: u32,
    position: Arc<Mutex<u8>>,
    travel: Mutex<Option<JoinHandle<()>>>,
}

impl VirtualCover {
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self {
            index,
            position: Arc::new(Mutex::new(0)),
            travel: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn master_id(&self) -> DeviceId {
        DeviceId::new(u64::from(self.index) * 100)
    }

    #[must_use]
    pub fn switch_id(&self) -> DeviceId {
        DeviceId::new(self.master_id().as_u64() + 1)
    }

    #[must_use]
    pub fn position_id(&self) -> DeviceId {
        DeviceId::new(self.master_id().as_u64() + 2)
    }

    /// Whether `id` is one of this cover's devices.
    #[must_use]
    pub fn owns(&self, id: DeviceId) -> bool {
        id == self.switch_id() || id == self.position_id()
    }

    /// Current position in percent.
    #[must_use]
    pub fn position(&self) -> u8 {
        *lock(&self.position)
    }

    /// Produce the switch and position device descriptors.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the builder fails.
    pub fn discover(&self) -> Result<Vec<Device>, BridgeError> {
        let master_name = format!("Virtual Cover {}", self.index);
        let switch = Device::builder()
            .id(self.switch_id())
            .device_name(SWITCH_DEVICE_NAME)
            .master_device_id(self.master_id())
            .master_device_name(master_name.clone())
            .device_designation("Rollladen")
            .build()?;
        let position = Device::builder()
            .id(self.position_id())
            .device_name(POSITION_DEVICE_NAME)
            .master_device_id(self.master_id())
            .master_device_name(master_name)
            .device_designation("Rollladen")
            .build()?;
        Ok(vec![switch, position])
    }

    /// Start moving towards `target`, replacing any travel in progress.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_travel(&self, target: u8, step: Duration, events: mpsc::Sender<HubEvent>) {
        let target = target.min(100);
        let handle = tokio::spawn(travel(
            Arc::clone(&self.position),
            target,
            step,
            self.position_id(),
            self.master_id(),
            events,
        ));
        if let Some(previous) = lock(&self.travel).replace(handle) {
            previous.abort();
        }
        tracing::debug!(cover = self.index, target, "cover travelling");
    }

    /// Halt the cover where it is. Returns `false` if it was not moving.
    pub fn stop(&self) -> bool {
        match lock(&self.travel).take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!(cover = self.index, position = self.position(), "cover stopped");
                true
            }
            _ => false,
        }
    }
}

impl Drop for VirtualCover {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn step_towards(current: u8, target: u8) -> u8 {
    if current < target {
        current.saturating_add(STEP).min(target)
    } else {
        current.saturating_sub(STEP).max(target)
    }
}

async fn travel(
    position: Arc<Mutex<u8>>,
    target: u8,
    step: Duration,
    position_id: DeviceId,
    master_id: DeviceId,
    events: mpsc::Sender<HubEvent>,
) {
    loop {
        tokio::time::sleep(step).await;
        let current = {
            let mut position = lock(&position);
            *position = step_towards(*position, target);
            *position
        };
        let update = DeviceUpdate::position(position_id, Some(master_id), u64::from(current));
        if events.send(HubEvent::ValueChanged(update)).await.is_err() || current == target {
            break;
        }
    }
}
