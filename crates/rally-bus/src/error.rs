//! Error types for the notification bus.
//!
//! Only bus *setup* is fallible from a caller's perspective. Publishing is
//! fire-and-forget: failures are logged and swallowed so they can never fail
//! the originating mutation.

/// Errors that can occur while setting up the notification bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The NATS connection could not be established.
    #[error("connect error: {0}")]
    Connect(String),

    /// The relay subscription could not be created.
    #[error("subscribe error: {0}")]
    Subscribe(String),
}
