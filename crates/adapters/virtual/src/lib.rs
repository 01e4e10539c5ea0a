//! # sfbridge-adapter-virtual
//!
//! Simulated Smart Friends hub for testing and demonstration.
//!
//! ## Provided devices
//!
//! For each configured cover `n` (starting at 1):
//!
//! | Device | Id | Behaviour |
//! |--------|----|-----------|
//! | `Schalter` | `n*100+1` | Echoes every value; open/close start travel, stop halts it |
//! | `Position` | `n*100+2` | Accepts a target 0–100; reports its position while travelling |
//!
//! ## Dependency rule
//!
//! Depends on `sfbridge-app` (port traits) and `sfbridge-domain` only.

mod config;
mod cover;

pub use config::VirtualHubConfig;
pub use cover::VirtualCover;

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use sfbridge_app::ports::HubClient;
use sfbridge_domain::command::{Command, CommandMapping};
use sfbridge_domain::device::Device;
use sfbridge_domain::error::{BridgeError, NotFoundError, ValidationError};
use sfbridge_domain::event::{DeviceUpdate, HubEvent};
use sfbridge_domain::id::DeviceId;
use sfbridge_domain::value::DeviceValue;

/// Virtual hub holding a fixed set of covers.
///
/// Events are pushed to the channel given at construction.
pub struct VirtualHub {
    covers: Vec<VirtualCover>,
    mapping: CommandMapping,
    travel_step: Duration,
    events: mpsc::Sender<HubEvent>,
}

impl VirtualHub {
    #[must_use]
    pub fn new(
        config: &VirtualHubConfig,
        mapping: CommandMapping,
        events: mpsc::Sender<HubEvent>,
    ) -> Self {
        Self {
            covers: (1..=config.covers).map(VirtualCover::new).collect(),
            mapping,
            travel_step: Duration::from_millis(config.travel_step_ms),
            events,
        }
    }

    /// Announce every device on the event channel.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Transport`] if the event channel is closed.
    pub async fn setup(&self) -> Result<(), BridgeError> {
        let devices = self.devices()?;
        tracing::info!(count = devices.len(), "virtual hub ready");
        for device in devices {
            self.events
                .send(HubEvent::DeviceDiscovered(device))
                .await
                .map_err(|err| BridgeError::Transport(err.into()))?;
        }
        Ok(())
    }

    /// Halt every cover.
    pub fn teardown(&self) {
        for cover in &self.covers {
            cover.stop();
        }
    }

    #[must_use]
    pub fn cover(&self, id: DeviceId) -> Option<&VirtualCover> {
        self.covers.iter().find(|cover| cover.owns(id))
    }

    fn devices(&self) -> Result<Vec<Device>, BridgeError> {
        let mut devices = Vec::with_capacity(self.covers.len() * 2);
        for cover in &self.covers {
            devices.extend(cover.discover()?);
        }
        Ok(devices)
    }

    fn apply(&self, id: DeviceId, value: DeviceValue) -> Result<Option<HubEvent>, BridgeError> {
        let cover = self.cover(id).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: id.to_string(),
        })?;

        if id == cover.position_id() {
            let target = position_target(&value)?;
            cover.start_travel(target, self.travel_step, self.events.clone());
            return Ok(None);
        }

        match self.mapping.command_for(&value.encode()) {
            Some(Command::Open) => cover.start_travel(0, self.travel_step, self.events.clone()),
            Some(Command::Close) => {
                cover.start_travel(100, self.travel_step, self.events.clone());
            }
            Some(Command::Stop) => {
                cover.stop();
            }
            None => {}
        }
        Ok(Some(HubEvent::ValueChanged(DeviceUpdate::new(
            id,
            Some(cover.master_id()),
            value,
        ))))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn position_target(value: &DeviceValue) -> Result<u8, ValidationError> {
    value
        .as_f64()
        .filter(|position| (0.0..=100.0).contains(position))
        .map(|position| position.round() as u8)
        .ok_or_else(|| ValidationError::InvalidPosition(value.to_string()))
}

impl HubClient for VirtualHub {
    fn set_device_value(
        &self,
        id: DeviceId,
        value: DeviceValue,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        // The dispatcher consuming hub events may be the caller, so the echo
        // must not wait for channel capacity.
        let result = self.apply(id, value).and_then(|event| match event {
            Some(event) => self
                .events
                .try_send(event)
                .map_err(|err| BridgeError::Transport(err.into())),
            None => Ok(()),
        });
        async { result }
    }

    fn device_map(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send {
        let result = self.devices();
        async { result }
    }
}
