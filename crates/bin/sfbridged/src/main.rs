//! # sfbridged — Smart Friends MQTT bridge daemon
//!
//! Composition root that wires the hub and the broker together.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Start the hub adapter and the MQTT connection
//! - Run the dispatcher until Ctrl-C, then shut everything down in order
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no bridge logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;

use sfbridge_adapter_mqtt::MqttConnection;
use sfbridge_adapter_virtual::VirtualHub;
use sfbridge_app::dispatcher::Dispatcher;
use sfbridge_app::services::bridge_service::BridgeService;

use config::{Config, LoggingConfig};

/// Capacity of the broker and hub event channels.
const CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging);

    let topics = config.topics()?;
    let (inbound_tx, inbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (hub_tx, hub_rx) = mpsc::channel(CHANNEL_CAPACITY);

    // Hub
    let hub = Arc::new(VirtualHub::new(
        &config.hub,
        config.payload.clone(),
        hub_tx,
    ));

    // Broker
    let (connection, publisher) = MqttConnection::start(&config.mqtt, inbound_tx)?;

    // Bridge
    let bridge = BridgeService::new(Arc::clone(&hub), publisher, config.payload, topics);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let dispatcher = tokio::spawn(Dispatcher::new(bridge, inbound_rx, hub_rx).run(shutdown_rx));

    hub.setup().await?;
    tracing::info!("sfbridged running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    if shutdown_tx.send(()).is_err() {
        tracing::debug!("dispatcher already stopped");
    }
    if let Err(err) = dispatcher.await {
        tracing::error!(%err, "dispatcher task failed");
    }
    connection.shutdown().await;
    hub.teardown();

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let directives = logging.directives();
    let (filter, invalid) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if invalid {
        tracing::warn!(%directives, "invalid log filter, falling back to `info`");
    }
}
