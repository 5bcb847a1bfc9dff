//! GraphQL schema for the Rally API.
//!
//! Exposes queries, mutations, and live subscriptions over the four entity
//! collections. Request parsing, validation of required input fields, and
//! response shaping are delegated to [`async_graphql`]; this crate wires
//! resolvers to the [`EntityStore`] and the notification [`EventBus`].
//!
//! The store and bus are injected as schema data by [`build_schema`]:
//! created once at process start, shared by every resolver.

pub mod error;
pub mod inputs;
pub mod mutation;
pub mod objects;
pub mod query;
pub mod subscription;

use std::sync::Arc;

use async_graphql::Schema;
use rally_bus::EventBus;
use rally_store::EntityStore;

pub use error::ApiError;
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use subscription::SubscriptionRoot;

/// The executable schema over all three operation roots.
pub type RallySchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the executable schema with the store and bus injected.
pub fn build_schema(store: Arc<EntityStore>, bus: EventBus) -> RallySchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(store)
        .data(bus)
        .finish()
}
