//! Bridge service — routes broker messages to the hub and hub events to the
//! broker.

use sfbridge_domain::command::CommandMapping;
use sfbridge_domain::device::Device;
use sfbridge_domain::error::BridgeError;
use sfbridge_domain::event::{DeviceUpdate, HubEvent};
use sfbridge_domain::message::InboundMessage;
use sfbridge_domain::topic::{InboundTopic, TopicScheme};
use sfbridge_domain::value::DeviceValue;

use crate::inference::derive_publications;
use crate::ports::{HubClient, MessagePublisher};
use crate::registry::DeviceRegistry;

/// Application service translating between the broker and the hub.
pub struct BridgeService<H, P> {
    hub: H,
    publisher: P,
    registry: DeviceRegistry,
    mapping: CommandMapping,
    topics: TopicScheme,
}

impl<H, P> BridgeService<H, P>
where
    H: HubClient,
    P: MessagePublisher,
{
    /// Create a new service with an empty registry.
    pub fn new(hub: H, publisher: P, mapping: CommandMapping, topics: TopicScheme) -> Self {
        Self {
            hub,
            publisher,
            registry: DeviceRegistry::new(),
            mapping,
            topics,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn topics(&self) -> &TopicScheme {
        &self.topics
    }

    /// Handle a message received from the broker.
    ///
    /// Only `update/<id>` topics are acted upon: the payload is decoded and
    /// handed to the hub. Any other topic is ignored.
    ///
    /// # Errors
    ///
    /// Returns the hub's error if setting the value fails.
    #[tracing::instrument(skip(self, message), fields(topic = %message.topic))]
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<(), BridgeError> {
        tracing::debug!(
            payload = %String::from_utf8_lossy(&message.payload),
            "new message"
        );

        let Some(InboundTopic::Update(device_id)) = self.topics.parse(&message.topic) else {
            tracing::debug!("no handler found for topic");
            return Ok(());
        };

        let value = DeviceValue::decode(&message.payload);
        tracing::debug!(%device_id, %value, "setting device value");
        self.hub.set_device_value(device_id, value).await
    }

    /// Handle an event emitted by the hub.
    ///
    /// # Errors
    ///
    /// Returns an error if refreshing the registry or publishing fails.
    pub async fn handle_hub_event(&self, event: HubEvent) -> Result<(), BridgeError> {
        match event {
            HubEvent::DeviceDiscovered(device) => self.handle_discovery(&device).await,
            HubEvent::ValueChanged(update) => self.publish_device_status(&update).await,
        }
    }

    /// Log a discovered device and reload the registry from the hub.
    ///
    /// # Errors
    ///
    /// Returns the hub's error if the device map cannot be read. The
    /// registry is left untouched in that case.
    pub async fn handle_discovery(&self, device: &Device) -> Result<(), BridgeError> {
        tracing::debug!(
            device_id = %device.id,
            master_device_id = ?device.master_device_id,
            master_device_name = ?device.master_device_name,
            device_name = %device.device_name,
            device_designation = ?device.device_designation,
            "device found"
        );
        self.refresh_registry().await
    }

    /// Replace the registry with the hub's current device map.
    ///
    /// # Errors
    ///
    /// Returns the hub's error if the device map cannot be read.
    pub async fn refresh_registry(&self) -> Result<(), BridgeError> {
        let devices = self.hub.device_map().await?;
        self.registry.replace(devices);
        tracing::debug!(count = self.registry.len(), "device registry refreshed");
        Ok(())
    }

    /// Publish a device's new value and every publication derived from it.
    ///
    /// A failed publication does not prevent the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns the first publisher error encountered.
    #[tracing::instrument(skip(self, update), fields(device_id = %update.device_id))]
    pub async fn publish_device_status(&self, update: &DeviceUpdate) -> Result<(), BridgeError> {
        let devices = self.registry.snapshot();
        let publications = derive_publications(update, &devices, &self.mapping, &self.topics);

        let mut first_error = None;
        for publication in publications {
            tracing::debug!("{} => {}", publication.topic, publication.payload);
            if let Err(err) = self.publisher.publish(publication).await {
                tracing::warn!(%err, "failed to publish");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
