//! Startup fixture: the static initial dataset loaded at process start.
//!
//! The fixture is a JSON document with four arrays (`users`, `events`,
//! `locations`, `participants`). It is read once during startup; there is
//! no durable write-back, so mutations live only in memory.

use std::path::Path;

use rally_types::{Event, Location, Participant, User};
use serde::Deserialize;

/// Errors that can occur when loading the fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Failed to read the fixture file from disk.
    #[error("failed to read fixture file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the fixture JSON.
    #[error("failed to parse fixture JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for FixtureError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// The static initial dataset. Missing arrays default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    /// Seed users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Seed events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Seed locations.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Seed participants.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Fixture {
    /// Load the fixture from a JSON file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] if the file cannot be read, or
    /// [`FixtureError::Json`] if the content is not valid fixture JSON.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a fixture from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Json`] if the string is not valid fixture
    /// JSON.
    pub fn parse(json: &str) -> Result<Self, FixtureError> {
        let fixture: Self = serde_json::from_str(json)?;
        Ok(fixture)
    }
}
