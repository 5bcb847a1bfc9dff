//! Entity records held by the in-memory store.
//!
//! Within each collection ids are unique and stable for the lifetime of the
//! record. Foreign keys are deliberately NOT enforced: an [`Event`] may
//! reference a deleted [`User`] or [`Location`], and relation resolution
//! treats that as "not found" rather than an error.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, LocationId, ParticipantId, UserId};

/// A registered user. Usernames are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned at creation.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Contact email address.
    pub email: String,
}

/// A place where events are held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier, assigned at creation.
    pub id: LocationId,
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Latitude in decimal degrees. Not range-checked.
    pub latitude: f64,
    /// Longitude in decimal degrees. Not range-checked.
    pub longitude: f64,
}

/// A scheduled event organized by a user at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, assigned at creation.
    pub id: EventId,
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
    /// The hosting location. May dangle after that location is deleted.
    pub location_id: LocationId,
    /// The organizing user. May dangle after that user is deleted.
    pub user_id: UserId,
}

/// An attendance record linking a user to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier, assigned at creation.
    pub id: ParticipantId,
    /// The attending user. May dangle after that user is deleted.
    pub user_id: UserId,
    /// The attended event. May dangle after that event is deleted.
    pub event_id: EventId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: EventId::new(),
            title: "Rust Meetup".to_owned(),
            description: "Monthly meetup".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap_or_default(),
            start_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
            location_id: LocationId::new(),
            user_id: UserId::new(),
        }
    }

    #[test]
    fn event_roundtrip_serde() {
        let event = sample_event();
        let json = serde_json::to_string(&event).ok();
        assert!(json.is_some());
        let restored: Result<Event, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(event));
    }

    #[test]
    fn event_json_field_names() {
        let event = sample_event();
        let value = serde_json::to_value(&event).unwrap_or_default();
        assert!(value.get("start_time").is_some());
        assert!(value.get("end_time").is_some());
        assert!(value.get("location_id").is_some());
        assert_eq!(
            value.get("date").and_then(serde_json::Value::as_str),
            Some("2026-09-12")
        );
    }

    #[test]
    fn user_deserializes_from_plain_json() {
        let json = r#"{
            "id": "01890b2e-9d6a-7c3f-8a54-2f1d3c4b5a69",
            "username": "ada",
            "email": "ada@example.com"
        }"#;
        let user: Result<User, _> = serde_json::from_str(json);
        assert!(user.is_ok());
        assert_eq!(user.ok().map(|u| u.username), Some("ada".to_owned()));
    }
}
