//! End-to-end tests for the bridge wiring.
//!
//! Each test runs the real dispatcher, bridge service and virtual hub. The
//! broker is replaced by a loopback publisher that records every publication
//! and feeds it back into the inbound channel, the way a broker delivers a
//! client's own publications on a `#` subscription. Time is paused, so cover
//! travel completes instantly.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use sfbridge_adapter_virtual::{VirtualHub, VirtualHubConfig};
use sfbridge_app::dispatcher::Dispatcher;
use sfbridge_app::ports::MessagePublisher;
use sfbridge_app::services::bridge_service::BridgeService;
use sfbridge_domain::command::CommandMapping;
use sfbridge_domain::error::BridgeError;
use sfbridge_domain::message::{InboundMessage, Publication};
use sfbridge_domain::topic::TopicScheme;

#[derive(Clone)]
struct LoopbackBroker {
    published: Arc<Mutex<Vec<Publication>>>,
    inbound: mpsc::Sender<InboundMessage>,
}

impl MessagePublisher for LoopbackBroker {
    fn publish(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let message = InboundMessage::new(publication.topic.clone(), publication.payload.clone());
        self.published.lock().unwrap().push(publication);
        let result = self
            .inbound
            .try_send(message)
            .map_err(|err| BridgeError::Transport(err.into()));
        async { result }
    }
}

type Bridge = BridgeService<Arc<VirtualHub>, LoopbackBroker>;

struct Harness {
    hub: Arc<VirtualHub>,
    published: Arc<Mutex<Vec<Publication>>>,
    inbound: mpsc::Sender<InboundMessage>,
    shutdown: oneshot::Sender<()>,
    dispatcher: JoinHandle<Bridge>,
}

impl Harness {
    async fn start(mapping: CommandMapping) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(256);
        let (hub_tx, hub_rx) = mpsc::channel(256);
        let config = VirtualHubConfig {
            covers: 2,
            travel_step_ms: 500,
        };
        let hub = Arc::new(VirtualHub::new(&config, mapping.clone(), hub_tx));
        let published = Arc::new(Mutex::new(Vec::new()));
        let broker = LoopbackBroker {
            published: Arc::clone(&published),
            inbound: inbound_tx.clone(),
        };
        let bridge = BridgeService::new(Arc::clone(&hub), broker, mapping, TopicScheme::default());
        let (shutdown, shutdown_rx) = oneshot::channel();
        let dispatcher = tokio::spawn(Dispatcher::new(bridge, inbound_rx, hub_rx).run(shutdown_rx));

        hub.setup().await.unwrap();
        settle().await;

        Self {
            hub,
            published,
            inbound: inbound_tx,
            shutdown,
            dispatcher,
        }
    }

    async fn send(&self, topic: &str, payload: &str) {
        self.inbound
            .send(InboundMessage::new(topic, payload))
            .await
            .unwrap();
    }

    fn take_published(&self) -> Vec<(String, String)> {
        self.published
            .lock()
            .unwrap()
            .drain(..)
            .map(|p| {
                assert!(p.retain);
                (p.topic, p.payload)
            })
            .collect()
    }

    async fn stop(self) -> Bridge {
        self.shutdown.send(()).unwrap();
        let bridge = self.dispatcher.await.unwrap();
        self.hub.teardown();
        bridge
    }
}

/// Let every pending task and cover travel run to completion.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(10)).await;
}

fn pair(topic: &str, payload: &str) -> (String, String) {
    (topic.to_string(), payload.to_string())
}

#[tokio::test(start_paused = true)]
async fn should_load_registry_from_discovered_devices() {
    let harness = Harness::start(CommandMapping::default()).await;

    assert!(harness.take_published().is_empty());
    let bridge = harness.stop().await;
    assert_eq!(bridge.registry().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn should_close_cover_and_stop_it_at_end_position() {
    let harness = Harness::start(CommandMapping::default()).await;

    harness.send("schellenberg/device/value/update/101", "2").await;
    settle().await;

    let mut expected = vec![
        pair("schellenberg/device/value/101", "2"),
        pair("schellenberg/device/value/102", "100"),
    ];
    for position in (10..=100).step_by(10) {
        let position = position.to_string();
        expected.push(pair("schellenberg/device/value/102", &position));
        expected.push(pair("schellenberg/device/value/current/102", &position));
    }
    expected.push(pair("schellenberg/device/value/update/101", "0"));
    expected.push(pair("schellenberg/device/value/101", "0"));

    assert_eq!(harness.take_published(), expected);
    assert_eq!(
        harness
            .hub
            .cover(sfbridge_domain::id::DeviceId::new(102))
            .unwrap()
            .position(),
        100
    );
    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_not_stop_cover_at_intermediate_position() {
    let harness = Harness::start(CommandMapping::default()).await;

    harness.send("schellenberg/device/value/update/202", "30").await;
    settle().await;

    assert_eq!(
        harness.take_published(),
        vec![
            pair("schellenberg/device/value/202", "10"),
            pair("schellenberg/device/value/current/202", "10"),
            pair("schellenberg/device/value/202", "20"),
            pair("schellenberg/device/value/current/202", "20"),
            pair("schellenberg/device/value/202", "30"),
            pair("schellenberg/device/value/current/202", "30"),
        ]
    );
    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_use_configured_command_payloads() {
    let harness = Harness::start(CommandMapping::new("50", "0", "25").unwrap()).await;

    harness.send("schellenberg/device/value/update/201", "50").await;
    settle().await;

    let published = harness.take_published();
    assert_eq!(
        &published[..2],
        &[
            pair("schellenberg/device/value/201", "50"),
            pair("schellenberg/device/value/202", "0"),
        ]
    );
    // Already open: the cover reports 0 once, which triggers the stop.
    assert_eq!(
        &published[2..],
        &[
            pair("schellenberg/device/value/202", "0"),
            pair("schellenberg/device/value/current/202", "0"),
            pair("schellenberg/device/value/update/201", "25"),
            pair("schellenberg/device/value/201", "25"),
        ]
    );
    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_keep_running_after_unknown_device() {
    let harness = Harness::start(CommandMapping::default()).await;

    harness.send("schellenberg/device/value/update/999", "1").await;
    harness.send("schellenberg/device/value/update/101", "hello").await;
    settle().await;

    assert_eq!(
        harness.take_published(),
        vec![pair("schellenberg/device/value/101", "\"hello\"")]
    );
    harness.stop().await;
}
