//! The [`EventBus`]: bounded per-topic fan-out plus the NATS backbone.
//!
//! Publishing is fire-and-forget. A publish serializes the record once,
//! delivers it synchronously to in-process subscribers, and enqueues the
//! NATS mirror onto a single background publisher task so the broker sees
//! this process's notifications in publish order. Serialization and broker
//! failures are logged and swallowed; they never reach the mutation caller.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::error::BusError;
use crate::topic::Topic;

/// Default capacity of each per-topic broadcast channel.
///
/// If a subscriber falls behind by more than this many payloads it skips
/// ahead to the oldest retained payload (drop-oldest) and keeps receiving.
pub const DEFAULT_CAPACITY: usize = 256;

/// Base delay for broker reconnect attempts.
const RECONNECT_BASE_MS: u64 = 250;

/// Ceiling for broker reconnect delays.
const RECONNECT_MAX: Duration = Duration::from_secs(30);

/// Wildcard subject matching every notification topic.
const RELAY_SUBJECT: &str = "rally.>";

/// A notification queued for the background NATS publisher task.
struct Outbound {
    subject: &'static str,
    payload: Vec<u8>,
}

/// Publish/subscribe fan-out for mutation notifications.
///
/// Cheap to clone; clones share the same channels and broker link. Create
/// one with [`EventBus::connect`] for cross-process delivery, or
/// [`EventBus::in_process`] for a bus without a broker (single-process
/// operation and tests).
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: BTreeMap<Topic, broadcast::Sender<Value>>,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
}

impl EventBus {
    /// Create a bus that fans out to in-process subscribers only.
    pub fn in_process(capacity: usize) -> Self {
        Self {
            channels: make_channels(capacity),
            outbound: None,
        }
    }

    /// Create a bus backed by a NATS connection.
    ///
    /// The connection suppresses its own echo and retries with capped
    /// exponential backoff, including on initial connect, so an unreachable
    /// broker delays cross-process delivery without failing startup. A
    /// relay task forwards notifications published by other processes into
    /// the local channels.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Connect`] if the client cannot be set up, or
    /// [`BusError::Subscribe`] if the relay subscription fails.
    pub async fn connect(url: &str, capacity: usize) -> Result<Self, BusError> {
        info!(url, "connecting notification bus to NATS");
        let client = async_nats::ConnectOptions::new()
            .no_echo()
            .retry_on_initial_connect()
            .reconnect_delay_callback(reconnect_delay)
            .event_callback(|event| async move {
                match event {
                    async_nats::Event::Connected => info!("NATS connection established"),
                    async_nats::Event::Disconnected => {
                        warn!("NATS connection lost, reconnecting with backoff");
                    }
                    other => debug!(event = %other, "NATS client event"),
                }
            })
            .connect(url)
            .await
            .map_err(|e| BusError::Connect(format!("failed to connect to {url}: {e}")))?;

        let relay = client.subscribe(RELAY_SUBJECT).await.map_err(|e| {
            BusError::Subscribe(format!("failed to subscribe to {RELAY_SUBJECT}: {e}"))
        })?;

        let channels = make_channels(capacity);
        tokio::spawn(run_relay(relay, channels.clone()));

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_publisher(client, outbound_rx));

        Ok(Self {
            channels,
            outbound: Some(outbound_tx),
        })
    }

    /// Publish a notification carrying `record` as payload.
    ///
    /// Fire-and-forget: the mutation's response is never blocked on
    /// subscriber delivery, and no failure here propagates to the caller.
    /// Publishing with zero subscribers is not an error.
    pub fn publish<T: Serialize>(&self, topic: Topic, record: &T) {
        let payload = match serde_json::to_value(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(topic = %topic, error = %e, "failed to serialize notification payload");
                return;
            }
        };

        if let Some(outbound) = &self.outbound {
            match serde_json::to_vec(&payload) {
                Ok(bytes) => {
                    let queued = outbound.send(Outbound {
                        subject: topic.subject(),
                        payload: bytes,
                    });
                    if queued.is_err() {
                        warn!(topic = %topic, "NATS publisher task stopped, notification stays local");
                    }
                }
                Err(e) => {
                    warn!(topic = %topic, error = %e, "failed to encode notification for NATS");
                }
            }
        }

        if let Some(tx) = self.channels.get(&topic) {
            // send errs only when there are zero receivers, which is the
            // normal no-subscribers case.
            let _ = tx.send(payload);
        }
    }

    /// Subscribe to one topic, receiving payloads published from now on.
    ///
    /// No replay: payloads published before this call are never delivered.
    /// Dropping the receiver deterministically releases its buffer and
    /// registration.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Value> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            None => {
                // Every topic is registered at construction; this branch
                // only keeps the function total. The receiver is born
                // closed.
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                rx
            }
        }
    }

    /// Subscribe to one topic as a [`Stream`] of payloads.
    ///
    /// A lagged subscriber drops the oldest payloads and resumes from the
    /// oldest retained one. The stream ends when the bus is dropped.
    pub fn stream(&self, topic: Topic) -> impl Stream<Item = Value> + Send + use<> {
        let receiver = self.subscribe(topic);
        futures::stream::unfold(receiver, move |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => return Some((payload, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(topic = %topic, skipped, "subscriber lagged, dropped oldest notifications");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}

/// Per-attempt reconnect delay: exponential from [`RECONNECT_BASE_MS`] up
/// to the [`RECONNECT_MAX`] ceiling.
fn reconnect_delay(attempts: usize) -> Duration {
    let exponent = u32::try_from(attempts).unwrap_or(u32::MAX).min(16);
    let millis = RECONNECT_BASE_MS.saturating_mul(2_u64.saturating_pow(exponent));
    Duration::from_millis(millis).min(RECONNECT_MAX)
}

/// Build the eight per-topic broadcast channels.
fn make_channels(capacity: usize) -> BTreeMap<Topic, broadcast::Sender<Value>> {
    Topic::ALL
        .into_iter()
        .map(|topic| {
            let (tx, _rx) = broadcast::channel(capacity.max(1));
            (topic, tx)
        })
        .collect()
}

/// Drain the outbound queue onto the broker, preserving publish order.
async fn run_publisher(client: async_nats::Client, mut queue: mpsc::UnboundedReceiver<Outbound>) {
    while let Some(outbound) = queue.recv().await {
        if let Err(e) = client.publish(outbound.subject, outbound.payload.into()).await {
            warn!(subject = outbound.subject, error = %e, "failed to publish notification to NATS");
        }
    }
    debug!("NATS publisher task stopped");
}

/// Forward notifications from other processes into the local channels.
async fn run_relay(
    mut subscriber: async_nats::Subscriber,
    channels: BTreeMap<Topic, broadcast::Sender<Value>>,
) {
    while let Some(message) = subscriber.next().await {
        let Some(topic) = Topic::from_subject(&message.subject) else {
            debug!(subject = %message.subject, "ignoring message on unrecognized subject");
            continue;
        };
        match serde_json::from_slice::<Value>(&message.payload) {
            Ok(payload) => {
                if let Some(tx) = channels.get(&topic) {
                    let _ = tx.send(payload);
                }
            }
            Err(e) => {
                warn!(topic = %topic, error = %e, "failed to decode relayed notification");
            }
        }
    }
    debug!("NATS relay task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(marker: u64) -> Value {
        serde_json::json!({ "marker": marker })
    }

    fn marker(value: &Value) -> Option<u64> {
        value.get("marker").and_then(Value::as_u64)
    }

    #[tokio::test]
    async fn subscriber_before_publish_receives_exactly_one() {
        let bus = EventBus::in_process(16);
        let mut rx = bus.subscribe(Topic::UserCreated);

        bus.publish(Topic::UserCreated, &payload(1));

        let received = rx.recv().await;
        assert_eq!(received.ok().as_ref().and_then(marker), Some(1));
        assert!(rx.try_recv().is_err(), "exactly one payload expected");
    }

    #[tokio::test]
    async fn subscriber_after_publish_sees_nothing() {
        let bus = EventBus::in_process(16);
        bus.publish(Topic::UserCreated, &payload(1));

        let mut rx = bus.subscribe(Topic::UserCreated);
        assert!(rx.try_recv().is_err(), "no replay for late subscribers");
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let bus = EventBus::in_process(16);
        let mut user_rx = bus.subscribe(Topic::UserCreated);

        bus.publish(Topic::EventCreated, &payload(7));
        assert!(user_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::in_process(16);
        // No receiver exists; this must neither error nor panic.
        bus.publish(Topic::LocationUpdated, &payload(3));
    }

    #[tokio::test]
    async fn lagged_subscriber_drops_oldest_and_continues() {
        let bus = EventBus::in_process(2);
        let stream = bus.stream(Topic::UserUpdated);
        futures::pin_mut!(stream);

        for n in 1..=4 {
            bus.publish(Topic::UserUpdated, &payload(n));
        }

        // Capacity 2: payloads 1 and 2 were dropped, 3 and 4 retained.
        let first = stream.next().await;
        let second = stream.next().await;
        assert_eq!(first.as_ref().and_then(marker), Some(3));
        assert_eq!(second.as_ref().and_then(marker), Some(4));
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_disturb_others() {
        let bus = EventBus::in_process(16);
        let dropped = bus.subscribe(Topic::ParticipantCreated);
        let mut kept = bus.subscribe(Topic::ParticipantCreated);
        drop(dropped);

        bus.publish(Topic::ParticipantCreated, &payload(9));
        let received = kept.recv().await;
        assert_eq!(received.ok().as_ref().and_then(marker), Some(9));
    }

    #[tokio::test]
    async fn stream_ends_when_bus_is_dropped() {
        let bus = EventBus::in_process(16);
        let stream = bus.stream(Topic::EventUpdated);
        futures::pin_mut!(stream);

        drop(bus);
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn reconnect_delay_grows_and_caps() {
        assert_eq!(reconnect_delay(0), Duration::from_millis(250));
        assert_eq!(reconnect_delay(1), Duration::from_millis(500));
        assert_eq!(reconnect_delay(2), Duration::from_millis(1000));
        assert!(reconnect_delay(6) < RECONNECT_MAX);
        assert_eq!(reconnect_delay(20), RECONNECT_MAX);
        assert_eq!(reconnect_delay(usize::MAX), RECONNECT_MAX);
    }

    // Integration tests that require a live NATS server are marked #[ignore].
    #[tokio::test]
    #[ignore]
    async fn connect_to_nats() {
        let result = EventBus::connect("nats://localhost:4222", DEFAULT_CAPACITY).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn fan_out_reaches_other_process_bus() {
        let publisher = EventBus::connect("nats://localhost:4222", DEFAULT_CAPACITY).await;
        let consumer = EventBus::connect("nats://localhost:4222", DEFAULT_CAPACITY).await;
        let (Ok(publisher), Ok(consumer)) = (publisher, consumer) else {
            tracing::error!("NATS connection failed");
            std::process::exit(1);
        };

        let mut rx = consumer.subscribe(Topic::UserCreated);
        // Give the consumer's relay subscription time to register.
        tokio::time::sleep(Duration::from_millis(200)).await;

        publisher.publish(Topic::UserCreated, &payload(42));

        let received = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(
            received.ok().and_then(Result::ok).as_ref().and_then(marker),
            Some(42)
        );
    }
}
