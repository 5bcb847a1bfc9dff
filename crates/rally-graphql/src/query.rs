//! Read-only query operations.
//!
//! Listing returns every record in insertion order; single-record fetches
//! fail with a typed `NOT_FOUND` error when the id is absent.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use rally_store::EntityStore;
use rally_types::{EventId, LocationId, ParticipantId, UserId};

use crate::error::{ApiError, parse_id};
use crate::objects::{Event, Location, Participant, User};

/// Root of all query operations.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// List all users.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store.users.list().await.into_iter().map(User::from).collect())
    }

    /// Fetch one user by id.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let user_id = parse_id(&id, UserId::parse)?;
        store
            .users
            .find(user_id)
            .await
            .map(User::from)
            .ok_or_else(|| ApiError::not_found("user", &id).extend())
    }

    /// List all events.
    async fn events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store.events.list().await.into_iter().map(Event::from).collect())
    }

    /// Fetch one event by id.
    async fn event(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let event_id = parse_id(&id, EventId::parse)?;
        store
            .events
            .find(event_id)
            .await
            .map(Event::from)
            .ok_or_else(|| ApiError::not_found("event", &id).extend())
    }

    /// List all locations.
    async fn locations(&self, ctx: &Context<'_>) -> Result<Vec<Location>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store
            .locations
            .list()
            .await
            .into_iter()
            .map(Location::from)
            .collect())
    }

    /// Fetch one location by id.
    async fn location(&self, ctx: &Context<'_>, id: ID) -> Result<Location> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let location_id = parse_id(&id, LocationId::parse)?;
        store
            .locations
            .find(location_id)
            .await
            .map(Location::from)
            .ok_or_else(|| ApiError::not_found("location", &id).extend())
    }

    /// List all participants.
    async fn participants(&self, ctx: &Context<'_>) -> Result<Vec<Participant>> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        Ok(store
            .participants
            .list()
            .await
            .into_iter()
            .map(Participant::from)
            .collect())
    }

    /// Fetch one participant by id.
    async fn participant(&self, ctx: &Context<'_>, id: ID) -> Result<Participant> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let participant_id = parse_id(&id, ParticipantId::parse)?;
        store
            .participants
            .find(participant_id)
            .await
            .map(Participant::from)
            .ok_or_else(|| ApiError::not_found("participant", &id).extend())
    }
}
