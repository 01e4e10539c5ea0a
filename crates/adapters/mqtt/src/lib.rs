//! # sfbridge-adapter-mqtt
//!
//! MQTT adapter — connects the bridge to an MQTT broker via `rumqttc`.
//!
//! ## Responsibilities
//! - Connect to the broker (optionally with credentials)
//! - Subscribe to `<base>/device/value/#` on every (re)connect
//! - Forward received messages into the dispatcher's broker channel
//! - Publish retained, qos 0 messages without waiting for the broker
//!
//! ## Dependency rule
//! Same as other adapters: depends on `sfbridge-app` and `sfbridge-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, Publish, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sfbridge_app::ports::MessagePublisher;
use sfbridge_domain::error::BridgeError;
use sfbridge_domain::message::{InboundMessage, Publication};
use sfbridge_domain::topic::TopicScheme;

/// Publishes onto the broker connection.
///
/// Publishing only enqueues the request for the event loop; it never waits
/// for the network, and fails if the request queue is full.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MessagePublisher for MqttPublisher {
    fn publish(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let result = self
            .client
            .try_publish(
                publication.topic,
                QoS::AtMostOnce,
                publication.retain,
                publication.payload,
            )
            .map_err(|err| MqttError::Client(err).into_domain());
        async { result }
    }
}

/// A running broker connection.
pub struct MqttConnection {
    client: AsyncClient,
    handle: Option<JoinHandle<()>>,
}

impl MqttConnection {
    /// Create the client and spawn its event loop.
    ///
    /// Received messages are sent to `inbound_tx`; the loop ends once that
    /// channel is closed or the connection is shut down.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Domain`] if `config.base_topic` is invalid.
    pub fn start(
        config: &MqttConfig,
        inbound_tx: mpsc::Sender<InboundMessage>,
    ) -> Result<(Self, MqttPublisher), MqttError> {
        let topics = TopicScheme::new(&config.base_topic).map_err(MqttError::Domain)?;
        let (client, eventloop) = AsyncClient::new(options(config), config.request_capacity);

        let handle = tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            topics.subscription_filter(),
            inbound_tx,
            Duration::from_secs(u64::from(config.reconnect_delay_secs)),
        ));

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "MQTT event loop started"
        );

        let publisher = MqttPublisher {
            client: client.clone(),
        };
        Ok((
            Self {
                client,
                handle: Some(handle),
            },
            publisher,
        ))
    }

    /// Disconnect from the broker and stop the event loop.
    pub async fn shutdown(mut self) {
        if let Err(err) = self.client.try_disconnect() {
            tracing::debug!(%err, "MQTT disconnect request failed");
        }
        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(Duration::from_secs(2), &mut handle)
                .await
                .is_err()
            {
                handle.abort();
                tracing::debug!("MQTT event loop aborted");
            }
        }
        tracing::info!("MQTT connection closed");
    }
}

fn options(config: &MqttConfig) -> MqttOptions {
    let mut options = MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
    if let Some(username) = &config.username {
        options.set_credentials(username, config.password.as_deref().unwrap_or_default());
    }
    options
}

pub(crate) fn inbound_message(publish: &Publish) -> InboundMessage {
    InboundMessage {
        topic: String::from_utf8_lossy(publish.topic.as_ref()).into_owned(),
        payload: publish.payload.to_vec(),
    }
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    filter: String,
    inbound_tx: mpsc::Sender<InboundMessage>,
    reconnect_delay: Duration,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::info!(code = ?ack.code, "connected to MQTT broker");
                // rumqttc does not restore subscriptions after a reconnect.
                match client.try_subscribe(&filter, QoS::AtMostOnce) {
                    Ok(()) => tracing::info!(%filter, "subscribed"),
                    Err(err) => tracing::error!(%err, %filter, "failed to subscribe"),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if inbound_tx.send(inbound_message(&publish)).await.is_err() {
                    tracing::debug!("broker channel closed, stopping MQTT event loop");
                    break;
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::debug!("disconnect sent, stopping MQTT event loop");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "MQTT connection error, retrying");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
