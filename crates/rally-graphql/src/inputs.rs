//! GraphQL input objects for the mutation operations.
//!
//! Create inputs carry every required field except the id, which is always
//! generated server-side. Update inputs make every field optional: absent
//! fields are preserved on the stored record (partial merge). Required
//! fields are enforced structurally by the schema boundary; no semantic
//! validation (coordinate ranges, referenced-id existence) happens here or
//! in the handlers.

use async_graphql::{ID, InputObject};
use chrono::{NaiveDate, NaiveTime};

/// Fields for creating a user.
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    /// Display name.
    pub username: String,
    /// Contact email address.
    pub email: String,
}

/// Partial update for a user.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateUserInput {
    /// New display name, if changing.
    pub username: Option<String>,
    /// New email address, if changing.
    pub email: Option<String>,
}

/// Fields for creating a location.
#[derive(Debug, Clone, InputObject)]
pub struct CreateLocationInput {
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Partial update for a location.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateLocationInput {
    /// New name, if changing.
    pub name: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New latitude, if changing.
    pub latitude: Option<f64>,
    /// New longitude, if changing.
    pub longitude: Option<f64>,
}

/// Fields for creating an event. Referenced ids are not checked for
/// existence.
#[derive(Debug, Clone, InputObject)]
pub struct CreateEventInput {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Calendar date the event takes place on.
    pub date: NaiveDate,
    /// Time the event starts.
    pub start_time: NaiveTime,
    /// Time the event ends.
    pub end_time: NaiveTime,
    /// The hosting location's id.
    pub location_id: ID,
    /// The organizing user's id.
    pub user_id: ID,
}

/// Partial update for an event.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateEventInput {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New date, if changing.
    pub date: Option<NaiveDate>,
    /// New start time, if changing.
    pub start_time: Option<NaiveTime>,
    /// New end time, if changing.
    pub end_time: Option<NaiveTime>,
    /// New hosting location id, if changing.
    pub location_id: Option<ID>,
    /// New organizing user id, if changing.
    pub user_id: Option<ID>,
}

/// Fields for creating a participant. Referenced ids are not checked for
/// existence.
#[derive(Debug, Clone, InputObject)]
pub struct CreateParticipantInput {
    /// The attending user's id.
    pub user_id: ID,
    /// The attended event's id.
    pub event_id: ID,
}

/// Partial update for a participant.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateParticipantInput {
    /// New attending user id, if changing.
    pub user_id: Option<ID>,
    /// New attended event id, if changing.
    pub event_id: Option<ID>,
}
