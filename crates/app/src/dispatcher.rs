//! Dispatcher — the single consumer loop of the bridge.
//!
//! Broker messages and hub events arrive on two channels. One task drains
//! both and hands each item to the [`BridgeService`], awaiting it to
//! completion before taking the next one, so handlers never interleave.

use tokio::sync::{mpsc, oneshot};

use sfbridge_domain::event::HubEvent;
use sfbridge_domain::message::InboundMessage;

use crate::ports::{HubClient, MessagePublisher};
use crate::services::bridge_service::BridgeService;

/// Drives a [`BridgeService`] from the broker and hub channels.
pub struct Dispatcher<H, P> {
    bridge: BridgeService<H, P>,
    inbound: mpsc::Receiver<InboundMessage>,
    hub_events: mpsc::Receiver<HubEvent>,
}

impl<H, P> Dispatcher<H, P>
where
    H: HubClient,
    P: MessagePublisher,
{
    pub fn new(
        bridge: BridgeService<H, P>,
        inbound: mpsc::Receiver<InboundMessage>,
        hub_events: mpsc::Receiver<HubEvent>,
    ) -> Self {
        Self {
            bridge,
            inbound,
            hub_events,
        }
    }

    /// Process items until `shutdown` fires (or its sender is dropped) or
    /// both channels are closed.
    ///
    /// Handler errors are logged and never stop the loop. Returns the
    /// bridge so callers can inspect its final state.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> BridgeService<H, P> {
        tracing::info!("dispatcher started");
        let mut inbound_open = true;
        let mut hub_open = true;

        while inbound_open || hub_open {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    break;
                }
                message = self.inbound.recv(), if inbound_open => match message {
                    Some(message) => {
                        if let Err(err) = self.bridge.handle_message(&message).await {
                            tracing::warn!(%err, topic = %message.topic, "failed to handle message");
                        }
                    }
                    None => {
                        tracing::debug!("broker channel closed");
                        inbound_open = false;
                    }
                },
                event = self.hub_events.recv(), if hub_open => match event {
                    Some(event) => {
                        if let Err(err) = self.bridge.handle_hub_event(event).await {
                            tracing::warn!(%err, "failed to handle hub event");
                        }
                    }
                    None => {
                        tracing::debug!("hub channel closed");
                        hub_open = false;
                    }
                },
            }
        }

        tracing::info!("dispatcher stopped");
        self.bridge
    }
}
