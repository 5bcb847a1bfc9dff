//! GraphQL object views over the stored entity records.
//!
//! Plain entities are [`SimpleObject`] views converted with `From`; the
//! event view resolves its relations lazily against the store, per query,
//! never cached. A dangling foreign key resolves to null (or an empty
//! list), never an error.

use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result, SimpleObject};
use chrono::{NaiveDate, NaiveTime};
use rally_store::EntityStore;
use rally_types as records;

/// GraphQL view of a user record.
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    /// Unique identifier.
    pub id: ID,
    /// Display name.
    pub username: String,
    /// Contact email address.
    pub email: String,
}

impl From<records::User> for User {
    fn from(record: records::User) -> Self {
        Self {
            id: ID(record.id.to_string()),
            username: record.username,
            email: record.email,
        }
    }
}

/// GraphQL view of a location record.
#[derive(Debug, Clone, SimpleObject)]
pub struct Location {
    /// Unique identifier.
    pub id: ID,
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl From<records::Location> for Location {
    fn from(record: records::Location) -> Self {
        Self {
            id: ID(record.id.to_string()),
            name: record.name,
            description: record.description,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// GraphQL view of a participant record.
#[derive(Debug, Clone, SimpleObject)]
pub struct Participant {
    /// Unique identifier.
    pub id: ID,
    /// The attending user's id.
    pub user_id: ID,
    /// The attended event's id.
    pub event_id: ID,
}

impl From<records::Participant> for Participant {
    fn from(record: records::Participant) -> Self {
        Self {
            id: ID(record.id.to_string()),
            user_id: ID(record.user_id.to_string()),
            event_id: ID(record.event_id.to_string()),
        }
    }
}

/// GraphQL view of an event record, with lazily resolved relations.
#[derive(Debug, Clone)]
pub struct Event(pub records::Event);

impl From<records::Event> for Event {
    fn from(record: records::Event) -> Self {
        Self(record)
    }
}

#[Object]
impl Event {
    /// Unique identifier.
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    /// Event title.
    async fn title(&self) -> &str {
        &self.0.title
    }

    /// Free-form description.
    async fn description(&self) -> &str {
        &self.0.description
    }

    /// Calendar date the event takes place on.
    async fn date(&self) -> NaiveDate {
        self.0.date
    }

    /// Time the event starts.
    async fn start_time(&self) -> NaiveTime {
        self.0.start_time
    }

    /// Time the event ends.
    async fn end_time(&self) -> NaiveTime {
        self.0.end_time
    }

    /// The hosting location's id (not checked for existence).
    async fn location_id(&self) -> ID {
        ID(self.0.location_id.to_string())
    }

    /// The organizing user's id (not checked for existence).
    async fn user_id(&self) -> ID {
        ID(self.0.user_id.to_string())
    }

    /// The organizing user, or null when the reference dangles.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store.users.find(self.0.user_id).await.map(User::from))
    }

    /// The hosting location, or null when the reference dangles.
    async fn location(&self, ctx: &Context<'_>) -> Result<Option<Location>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store.locations.find(self.0.location_id).await.map(Location::from))
    }

    /// Attendance records for this event, in insertion order.
    async fn participants(&self, ctx: &Context<'_>) -> Result<Vec<Participant>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let event_id = self.0.id;
        Ok(store
            .participants
            .find_matching(move |p| p.event_id == event_id)
            .await
            .into_iter()
            .map(Participant::from)
            .collect())
    }
}
