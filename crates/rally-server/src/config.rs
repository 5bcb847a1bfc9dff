//! Environment-based configuration for the Rally server.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults, so the binary runs out of the box against a local NATS and
//! the bundled seed fixture.

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// NATS server URL for the notification bus backbone.
    pub nats_url: String,
    /// Path to the JSON seed fixture loaded at startup.
    pub fixture_path: String,
    /// Per-subscriber notification buffer bound.
    pub bus_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            nats_url: default_nats_url(),
            fixture_path: default_fixture_path(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables (all have defaults):
    /// - `RALLY_HOST` -- bind address (default `0.0.0.0`)
    /// - `RALLY_PORT` -- listen port (default `4000`)
    /// - `NATS_URL` -- broker connection string (default
    ///   `nats://localhost:4222`)
    /// - `FIXTURE_PATH` -- seed dataset path (default `data/seed.json`)
    /// - `BUS_CAPACITY` -- per-subscriber notification buffer bound
    ///   (default `256`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("RALLY_HOST").unwrap_or_else(|_| default_host());

        let port: u16 = std::env::var("RALLY_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "RALLY_PORT",
                message: format!("{e}"),
            })?;

        let nats_url = std::env::var("NATS_URL").unwrap_or_else(|_| default_nats_url());

        let fixture_path =
            std::env::var("FIXTURE_PATH").unwrap_or_else(|_| default_fixture_path());

        let bus_capacity: usize = std::env::var("BUS_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_BUS_CAPACITY.to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "BUS_CAPACITY",
                message: format!("{e}"),
            })?;

        Ok(Self {
            host,
            port,
            nats_url,
            fixture_path,
            bus_capacity,
        })
    }
}

/// Default listen port, matching the original deployment of this API.
const DEFAULT_PORT: u16 = 4000;

/// Default per-subscriber notification buffer bound.
const DEFAULT_BUS_CAPACITY: usize = 256;

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_owned()
}

fn default_fixture_path() -> String {
    "data/seed.json".to_owned()
}
