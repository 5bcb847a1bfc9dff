//! Notification topics and their NATS subject mapping.
//!
//! One topic exists per `<entity><Created|Updated>` pair. Deletes publish
//! no notification, so no delete topics exist.

/// A notification topic: one entity kind crossed with create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// A user was created.
    UserCreated,
    /// A user was updated.
    UserUpdated,
    /// An event was created.
    EventCreated,
    /// An event was updated.
    EventUpdated,
    /// A location was created.
    LocationCreated,
    /// A location was updated.
    LocationUpdated,
    /// A participant was created.
    ParticipantCreated,
    /// A participant was updated.
    ParticipantUpdated,
}

impl Topic {
    /// Every topic, in a stable order. Used to register channels at bus
    /// construction.
    pub const ALL: [Self; 8] = [
        Self::UserCreated,
        Self::UserUpdated,
        Self::EventCreated,
        Self::EventUpdated,
        Self::LocationCreated,
        Self::LocationUpdated,
        Self::ParticipantCreated,
        Self::ParticipantUpdated,
    ];

    /// The NATS subject this topic is published on.
    ///
    /// Subject format: `rally.{entity}.{created|updated}`.
    pub const fn subject(self) -> &'static str {
        match self {
            Self::UserCreated => "rally.user.created",
            Self::UserUpdated => "rally.user.updated",
            Self::EventCreated => "rally.event.created",
            Self::EventUpdated => "rally.event.updated",
            Self::LocationCreated => "rally.location.created",
            Self::LocationUpdated => "rally.location.updated",
            Self::ParticipantCreated => "rally.participant.created",
            Self::ParticipantUpdated => "rally.participant.updated",
        }
    }

    /// Map a NATS subject back to its topic.
    ///
    /// Returns `None` for subjects outside the `rally.*` notification
    /// namespace or with an unknown entity/action pair.
    pub fn from_subject(subject: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.subject() == subject)
    }
}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.subject())
    }
}
