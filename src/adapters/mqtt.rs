//! MQTT broker adapter.
//!
//! Implements [`TelemetryPort`] for outbound readings and carries inbound
//! override messages from the client's connection thread to the control
//! loop.
//!
//! ```text
//! ┌──────────────────┐ InboundMessage ┌──────────────────┐
//! │ MQTT conn thread │──────────────▶│   Control loop    │
//! │ (ESP-IDF client) │  INBOUND chan  │ poll_inbound()    │
//! └──────────────────┘                └──────────────────┘
//! ```
//!
//! The connection thread never touches controller state: it only records
//! link up/down in atomics and enqueues raw messages. The loop drains the
//! queue without blocking and applies each message through the controller.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspMqttClient` plus a dedicated thread
//!   pumping `EspMqttConnection::next()`.
//! - **all other targets**: an in-memory broker that records publishes and
//!   subscriptions for host-side tests.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::{info, warn};

use crate::app::ports::TelemetryPort;
use crate::config::{NetworkConfig, Topics};
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
};

// ───────────────────────────────────────────────────────────────
// Inbound queue
// ───────────────────────────────────────────────────────────────

pub const TOPIC_CAPACITY: usize = 64;
pub const PAYLOAD_CAPACITY: usize = 32;

/// Raw inbound message, copied out of the client's buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: heapless::String<TOPIC_CAPACITY>,
    pub payload: heapless::Vec<u8, PAYLOAD_CAPACITY>,
}

impl InboundMessage {
    /// `None` if either part exceeds its capacity. No override topic or
    /// payload comes close, so such messages are not ours.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut t = heapless::String::new();
        t.push_str(topic).ok()?;
        let p = heapless::Vec::from_slice(payload).ok()?;
        Some(Self { topic: t, payload: p })
    }
}

/// Channel depth for inbound messages.
const INBOUND_DEPTH: usize = 8;

/// Inbound message channel: connection thread → control loop.
static INBOUND: Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_DEPTH> = Channel::new();

/// Broker session is up.
static CONNECTED: AtomicBool = AtomicBool::new(false);
/// Set on every (re)connect; cleared once the override topics are subscribed.
static NEEDS_SUBSCRIBE: AtomicBool = AtomicBool::new(false);

/// Queue an inbound message for the control loop. Returns `false` if it
/// was dropped (oversized or queue full).
pub fn enqueue_inbound(topic: &str, payload: &[u8]) -> bool {
    let Some(msg) = InboundMessage::new(topic, payload) else {
        warn!("MQTT: dropping oversized message on '{}'", topic);
        return false;
    };
    match INBOUND.try_send(msg) {
        Ok(()) => true,
        Err(TrySendError::Full(msg)) => {
            warn!("MQTT: inbound queue full, dropping message on '{}'", msg.topic);
            false
        }
    }
}

fn on_connected() {
    CONNECTED.store(true, Ordering::Release);
    NEEDS_SUBSCRIBE.store(true, Ordering::Release);
    info!("MQTT: connected");
}

fn on_disconnected() {
    if CONNECTED.swap(false, Ordering::AcqRel) {
        warn!("MQTT: disconnected");
    }
}

pub fn is_connected() -> bool {
    CONNECTED.load(Ordering::Acquire)
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttAdapter {
    #[cfg(target_os = "espidf")]
    client: EspMqttClient<'static>,
    url: &'static str,
    subscriptions: [&'static str; 2],
    retry_ms: u32,
    #[cfg(not(target_os = "espidf"))]
    sim: SimBroker,
}

impl MqttAdapter {
    /// Create the client and start its connection thread. The session
    /// comes up asynchronously; call [`ensure_connected`](Self::ensure_connected)
    /// before relying on it.
    #[cfg(target_os = "espidf")]
    pub fn start(
        network: &NetworkConfig,
        topics: &Topics,
        retry_ms: u32,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let conf = MqttClientConfiguration {
            client_id: Some(network.mqtt_client_id),
            ..Default::default()
        };
        let (client, conn) = EspMqttClient::new(network.mqtt_url, &conf)?;
        spawn_connection_thread(conn);
        info!(
            "MQTT: client '{}' started for {}",
            network.mqtt_client_id, network.mqtt_url
        );
        Ok(Self {
            client,
            url: network.mqtt_url,
            subscriptions: [topics.fan_temp_override, topics.fan_humidity_override],
            retry_ms,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(
        network: &NetworkConfig,
        topics: &Topics,
        retry_ms: u32,
    ) -> Result<Self, CommsError> {
        info!("MQTT(sim): client '{}' for {}", network.mqtt_client_id, network.mqtt_url);
        Ok(Self {
            url: network.mqtt_url,
            subscriptions: [topics.fan_temp_override, topics.fan_humidity_override],
            retry_ms,
            sim: SimBroker::default(),
        })
    }

    /// Block until the broker session is up, retrying at a fixed
    /// interval with no upper bound, then (re)subscribe the override
    /// topics if this is a fresh session.
    pub fn ensure_connected(&mut self) {
        let mut attempt: u32 = 0;
        while !is_connected() {
            attempt = attempt.wrapping_add(1);
            info!("MQTT: connecting to {} (attempt {})", self.url, attempt);
            if self.platform_try_connect() {
                break;
            }
            warn!("MQTT: broker unavailable, retry in {} ms", self.retry_ms);
            std::thread::sleep(std::time::Duration::from_millis(u64::from(self.retry_ms)));
        }

        if NEEDS_SUBSCRIBE.swap(false, Ordering::AcqRel) {
            if let Err(e) = self.subscribe_overrides() {
                warn!("MQTT: {}, will retry next cycle", e);
                NEEDS_SUBSCRIBE.store(true, Ordering::Release);
            }
        }
    }

    /// Drain every queued inbound message without blocking.
    pub fn poll_inbound(&mut self, mut handle: impl FnMut(&str, &[u8])) -> usize {
        let mut drained = 0;
        while let Ok(msg) = INBOUND.try_receive() {
            handle(msg.topic.as_str(), &msg.payload);
            drained += 1;
        }
        drained
    }

    fn subscribe_overrides(&mut self) -> Result<(), CommsError> {
        for topic in self.subscriptions {
            self.platform_subscribe(topic)?;
            info!("MQTT: subscribed to {}", topic);
        }
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    /// The ESP-IDF client reconnects on its own; this only reports
    /// whether the connection thread has seen the session come up.
    #[cfg(target_os = "espidf")]
    fn platform_try_connect(&mut self) -> bool {
        is_connected()
    }

    #[cfg(target_os = "espidf")]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| CommsError::MqttSubscribeFailed)
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .map(|_| ())
            .map_err(|_| CommsError::MqttPublishFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_try_connect(&mut self) -> bool {
        self.sim.connect_attempts += 1;
        if self.sim.refuse_connects > 0 {
            self.sim.refuse_connects -= 1;
            return false;
        }
        on_connected();
        true
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.sim.subscriptions.push(topic.to_string());
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if self.sim.fail_publishes {
            return Err(CommsError::MqttPublishFailed);
        }
        self.sim.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// TelemetryPort
// ───────────────────────────────────────────────────────────────

impl TelemetryPort for MqttAdapter {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if !is_connected() {
            return Err(CommsError::MqttNotConnected);
        }
        self.platform_publish(topic, payload)
    }
}

// ───────────────────────────────────────────────────────────────
// Connection thread (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn spawn_connection_thread(mut conn: EspMqttConnection) {
    let spawned = std::thread::Builder::new()
        .name("mqtt-conn".into())
        .stack_size(6 * 1024)
        .spawn(move || {
            while let Ok(event) = conn.next() {
                match event.payload() {
                    EventPayload::Connected(_) => on_connected(),
                    EventPayload::Disconnected => on_disconnected(),
                    EventPayload::Received {
                        topic: Some(topic),
                        data,
                        details: Details::Complete,
                        ..
                    } => {
                        enqueue_inbound(topic, data);
                    }
                    EventPayload::Error(e) => warn!("MQTT: connection error: {:?}", e),
                    _ => {}
                }
            }
            on_disconnected();
            info!("MQTT: connection thread exiting");
        });
    if let Err(e) = spawned {
        log::error!("MQTT: failed to spawn connection thread: {}", e);
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimBroker {
    published: Vec<(String, String)>,
    subscriptions: Vec<String>,
    connect_attempts: u32,
    refuse_connects: u32,
    fail_publishes: bool,
}

#[cfg(not(target_os = "espidf"))]
impl MqttAdapter {
    /// Deliver a message as if the broker had pushed it.
    pub fn sim_inject(topic: &str, payload: &[u8]) -> bool {
        enqueue_inbound(topic, payload)
    }

    /// Drop the session as the connection thread would on link loss.
    pub fn sim_drop_session() {
        on_disconnected();
    }

    /// Refuse the next `n` connect attempts.
    pub fn sim_refuse_connects(&mut self, n: u32) {
        self.sim.refuse_connects = n;
    }

    pub fn sim_fail_publishes(&mut self, fail: bool) {
        self.sim.fail_publishes = fail;
    }

    pub fn sim_published(&self) -> &[(String, String)] {
        &self.sim.published
    }

    pub fn sim_subscriptions(&self) -> &[String] {
        &self.sim.subscriptions
    }

    pub fn sim_connect_attempts(&self) -> u32 {
        self.sim.connect_attempts
    }
}
