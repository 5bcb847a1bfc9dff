//! Shared type definitions for the Rally API.
//!
//! Defines the four entity records (users, events, locations, participants)
//! and their strongly-typed identifiers. Records are plain serde-serializable
//! data: the GraphQL views live in `rally-graphql`, storage in `rally-store`.

pub mod ids;
pub mod records;

pub use ids::{EventId, LocationId, ParticipantId, UserId};
pub use records::{Event, Location, Participant, User};
