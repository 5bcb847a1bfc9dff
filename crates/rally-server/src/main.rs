//! Rally API server entry point.
//!
//! Serves a GraphQL API over four in-memory collections (users, events,
//! locations, participants) with live subscriptions for create/update
//! notifications.
//!
//! # Architecture
//!
//! ```text
//! HTTP request --> GraphQL schema --> Entity Store (in-memory)
//!                        |                  |
//!                        |            (commit first)
//!                        v                  v
//!                  subscription <-- Notification Bus <--> NATS
//! ```
//!
//! The store is seeded from a JSON fixture at startup; mutations live only
//! in memory. The bus mirrors every create/update notification over NATS
//! so subscribers on every process observe the same mutation stream.

use std::path::Path;
use std::sync::Arc;

use rally_bus::EventBus;
use rally_graphql::build_schema;
use rally_server::{ServerConfig, start_server};
use rally_store::{EntityStore, Fixture};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("rally-server starting");

    // Load configuration from environment
    let config = ServerConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        nats_url = config.nats_url,
        fixture_path = config.fixture_path,
        bus_capacity = config.bus_capacity,
        "configuration loaded"
    );

    // Seed the entity store once; state lives in memory for the process
    // lifetime.
    let fixture = Fixture::from_file(Path::new(&config.fixture_path))?;
    let store = Arc::new(EntityStore::from_fixture(fixture));

    // Connect the notification bus. An unreachable broker does not fail
    // startup; the link retries with capped exponential backoff.
    let bus = EventBus::connect(&config.nats_url, config.bus_capacity).await?;

    let schema = build_schema(store, bus);
    info!("GraphQL schema built");

    start_server(&config, schema).await?;

    Ok(())
}
