//! Mutation notification bus for the Rally API.
//!
//! Decouples "a mutation happened" from "subscribers are told about it",
//! across potentially many server processes sharing one logical dataset
//! view. Mutation handlers publish a named topic after a successful
//! create/update; subscription endpoints consume a push stream of payloads
//! for one topic.
//!
//! # Delivery semantics
//!
//! At-most-once, best-effort, no replay. A subscriber that connects after a
//! publish never sees it. Ordering is preserved per topic per origin
//! process; no global order is guaranteed across topics or across
//! publishing processes.
//!
//! # Fan-out
//!
//! In-process subscribers are served by one bounded
//! [`tokio::sync::broadcast`] channel per topic. Cross-process fan-out rides
//! on NATS: every publish is mirrored to a subject, and a relay task
//! forwards subjects published by *other* processes (the connection
//! suppresses its own echo) into the same local channels.
//!
//! # Backpressure
//!
//! Per-subscriber buffering is bounded by the channel capacity. The policy
//! is drop-oldest: a subscriber that falls behind skips ahead to the oldest
//! retained payload and keeps its subscription. A slow subscriber never
//! blocks publishers or other subscribers.

pub mod bus;
pub mod error;
pub mod topic;

pub use bus::{DEFAULT_CAPACITY, EventBus};
pub use error::BusError;
pub use topic::Topic;
