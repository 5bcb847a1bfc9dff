//! The [`EntityStore`]: one owned object holding all four collections.
//!
//! Created once at process start (optionally from a fixture) and injected
//! into every handler. There is no teardown beyond process exit.

use rally_types::{Event, EventId, Location, LocationId, Participant, ParticipantId, User, UserId};
use tracing::info;

use crate::collection::{Collection, Record};
use crate::fixture::Fixture;

impl Record for User {
    type Id = UserId;

    const KIND: &'static str = "user";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Event {
    type Id = EventId;

    const KIND: &'static str = "event";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Location {
    type Id = LocationId;

    const KIND: &'static str = "location";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Participant {
    type Id = ParticipantId;

    const KIND: &'static str = "participant";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// The four in-memory collections backing the API.
///
/// All reads and writes operate directly on these collections. Foreign keys
/// between them are not enforced; deletes do not cascade.
#[derive(Debug, Default)]
pub struct EntityStore {
    /// Registered users.
    pub users: Collection<User>,
    /// Scheduled events.
    pub events: Collection<Event>,
    /// Event locations.
    pub locations: Collection<Location>,
    /// Attendance records.
    pub participants: Collection<Participant>,
}

impl EntityStore {
    /// Create a store with four empty collections.
    pub const fn new() -> Self {
        Self {
            users: Collection::new(),
            events: Collection::new(),
            locations: Collection::new(),
            participants: Collection::new(),
        }
    }

    /// Create a store seeded from a fixture, preserving record order.
    pub fn from_fixture(fixture: Fixture) -> Self {
        info!(
            users = fixture.users.len(),
            events = fixture.events.len(),
            locations = fixture.locations.len(),
            participants = fixture.participants.len(),
            "seeding entity store from fixture"
        );
        Self {
            users: Collection::with_items(fixture.users),
            events: Collection::with_items(fixture.events),
            locations: Collection::with_items(fixture.locations),
            participants: Collection::with_items(fixture.participants),
        }
    }
}
