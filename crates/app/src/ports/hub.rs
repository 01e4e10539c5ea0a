//! Hub port — the Smart Friends hub as seen by the bridge.
//!
//! The hub pushes [`HubEvent`](sfbridge_domain::event::HubEvent)s through a
//! channel handed to the adapter at construction; this trait covers the
//! calls the bridge makes towards the hub.

use std::future::Future;

use sfbridge_domain::device::Device;
use sfbridge_domain::error::BridgeError;
use sfbridge_domain::id::DeviceId;
use sfbridge_domain::value::DeviceValue;

/// Outbound operations on the home-automation hub.
pub trait HubClient {
    /// Ask the hub to set `value` on device `id`.
    fn set_device_value(
        &self,
        id: DeviceId,
        value: DeviceValue,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Full snapshot of every device the hub currently knows.
    fn device_map(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send;
}

impl<T: HubClient + Send + Sync> HubClient for std::sync::Arc<T> {
    fn set_device_value(
        &self,
        id: DeviceId,
        value: DeviceValue,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).set_device_value(id, value)
    }

    fn device_map(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send {
        (**self).device_map()
    }
}
