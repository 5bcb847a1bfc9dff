//! In-memory entity storage for the Rally API.
//!
//! The store holds four ordered collections (users, events, locations,
//! participants) loaded once at process start from a JSON fixture. All reads
//! and writes operate directly on these collections; there is no persistence
//! and state is lost on restart by design.
//!
//! Lookups are linear scans keyed by id. No secondary index is built, which
//! is an explicit performance ceiling: the dataset is expected to be small
//! and entirely memory-resident. Every operation takes its collection's lock
//! exactly once, so each store call is a single critical section.

pub mod collection;
pub mod error;
pub mod fixture;
pub mod store;

pub use collection::{Collection, Record};
pub use error::StoreError;
pub use fixture::{Fixture, FixtureError};
pub use store::EntityStore;
