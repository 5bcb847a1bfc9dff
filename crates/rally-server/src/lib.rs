//! Rally API server: Axum transport wiring for the GraphQL schema.
//!
//! The binary entry point lives in `main.rs`; this library exposes the
//! configuration, router, and server lifecycle so they can be exercised
//! directly in tests without a TCP listener.

pub mod config;
pub mod router;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use router::build_router;
pub use server::{ServerError, start_server};
