//! Mutation operations: one create/update/delete/deleteAll quadruple per
//! entity type.
//!
//! Every handler follows the same two-step contract: commit the change to
//! the store first, then notify the bus best-effort. A publish failure is
//! contained inside the bus and can never fail the mutation. Create and
//! update publish their topic; delete and deleteAll publish nothing.
//!
//! Updates merge the supplied fields over the existing record and re-check
//! existence when writing back, so a delete racing the merge surfaces as
//! `NOT_FOUND` instead of resurrecting the record.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use rally_bus::{EventBus, Topic};
use rally_store::EntityStore;
use rally_types::{self as records, EventId, LocationId, ParticipantId, UserId};

use crate::error::{ApiError, parse_id};
use crate::inputs::{
    CreateEventInput, CreateLocationInput, CreateParticipantInput, CreateUserInput,
    UpdateEventInput, UpdateLocationInput, UpdateParticipantInput, UpdateUserInput,
};
use crate::objects::{Event, Location, Participant, User};

/// Root of all mutation operations.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    // -----------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------

    /// Create a user and return the created record.
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let record = records::User {
            id: UserId::new(),
            username: input.username,
            email: input.email,
        };
        let created = store.users.insert(record).await;
        bus.publish(Topic::UserCreated, &created);
        Ok(created.into())
    }

    /// Merge the supplied fields into an existing user.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateUserInput,
    ) -> Result<User> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let user_id = parse_id(&id, UserId::parse)?;

        let mut record = store
            .users
            .find(user_id)
            .await
            .ok_or_else(|| ApiError::not_found("user", &id).extend())?;
        if let Some(username) = input.username {
            record.username = username;
        }
        if let Some(email) = input.email {
            record.email = email;
        }

        let updated = store
            .users
            .replace(user_id, record)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        bus.publish(Topic::UserUpdated, &updated);
        Ok(updated.into())
    }

    /// Delete a user, returning the pre-removal snapshot. No notification
    /// is published for deletes.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let user_id = parse_id(&id, UserId::parse)?;
        let removed = store
            .users
            .remove(user_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(removed.into())
    }

    /// Delete every user and return the count removed.
    async fn delete_all_users(&self, ctx: &Context<'_>) -> Result<u32> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let removed = store.users.clear().await;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }

    // -----------------------------------------------------------------
    // Locations
    // -----------------------------------------------------------------

    /// Create a location and return the created record.
    async fn create_location(
        &self,
        ctx: &Context<'_>,
        input: CreateLocationInput,
    ) -> Result<Location> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let record = records::Location {
            id: LocationId::new(),
            name: input.name,
            description: input.description,
            latitude: input.latitude,
            longitude: input.longitude,
        };
        let created = store.locations.insert(record).await;
        bus.publish(Topic::LocationCreated, &created);
        Ok(created.into())
    }

    /// Merge the supplied fields into an existing location.
    async fn update_location(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateLocationInput,
    ) -> Result<Location> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let location_id = parse_id(&id, LocationId::parse)?;

        let mut record = store
            .locations
            .find(location_id)
            .await
            .ok_or_else(|| ApiError::not_found("location", &id).extend())?;
        if let Some(name) = input.name {
            record.name = name;
        }
        if let Some(description) = input.description {
            record.description = description;
        }
        if let Some(latitude) = input.latitude {
            record.latitude = latitude;
        }
        if let Some(longitude) = input.longitude {
            record.longitude = longitude;
        }

        let updated = store
            .locations
            .replace(location_id, record)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        bus.publish(Topic::LocationUpdated, &updated);
        Ok(updated.into())
    }

    /// Delete a location, returning the pre-removal snapshot. Events
    /// referencing it are left in place with a dangling id.
    async fn delete_location(&self, ctx: &Context<'_>, id: ID) -> Result<Location> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let location_id = parse_id(&id, LocationId::parse)?;
        let removed = store
            .locations
            .remove(location_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(removed.into())
    }

    /// Delete every location and return the count removed.
    async fn delete_all_locations(&self, ctx: &Context<'_>) -> Result<u32> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let removed = store.locations.clear().await;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    /// Create an event and return the created record. Referenced ids are
    /// parsed but not checked for existence.
    async fn create_event(&self, ctx: &Context<'_>, input: CreateEventInput) -> Result<Event> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let record = records::Event {
            id: EventId::new(),
            title: input.title,
            description: input.description,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            location_id: parse_id(&input.location_id, LocationId::parse)?,
            user_id: parse_id(&input.user_id, UserId::parse)?,
        };
        let created = store.events.insert(record).await;
        bus.publish(Topic::EventCreated, &created);
        Ok(created.into())
    }

    /// Merge the supplied fields into an existing event.
    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateEventInput,
    ) -> Result<Event> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let event_id = parse_id(&id, EventId::parse)?;

        let mut record = store
            .events
            .find(event_id)
            .await
            .ok_or_else(|| ApiError::not_found("event", &id).extend())?;
        if let Some(title) = input.title {
            record.title = title;
        }
        if let Some(description) = input.description {
            record.description = description;
        }
        if let Some(date) = input.date {
            record.date = date;
        }
        if let Some(start_time) = input.start_time {
            record.start_time = start_time;
        }
        if let Some(end_time) = input.end_time {
            record.end_time = end_time;
        }
        if let Some(location_id) = input.location_id {
            record.location_id = parse_id(&location_id, LocationId::parse)?;
        }
        if let Some(user_id) = input.user_id {
            record.user_id = parse_id(&user_id, UserId::parse)?;
        }

        let updated = store
            .events
            .replace(event_id, record)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        bus.publish(Topic::EventUpdated, &updated);
        Ok(updated.into())
    }

    /// Delete an event, returning the pre-removal snapshot. Participants
    /// referencing it are not cascaded.
    async fn delete_event(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let event_id = parse_id(&id, EventId::parse)?;
        let removed = store
            .events
            .remove(event_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(removed.into())
    }

    /// Delete every event and return the count removed.
    async fn delete_all_events(&self, ctx: &Context<'_>) -> Result<u32> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let removed = store.events.clear().await;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }

    // -----------------------------------------------------------------
    // Participants
    // -----------------------------------------------------------------

    /// Create a participant and return the created record. Referenced ids
    /// are parsed but not checked for existence.
    async fn create_participant(
        &self,
        ctx: &Context<'_>,
        input: CreateParticipantInput,
    ) -> Result<Participant> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let record = records::Participant {
            id: ParticipantId::new(),
            user_id: parse_id(&input.user_id, UserId::parse)?,
            event_id: parse_id(&input.event_id, EventId::parse)?,
        };
        let created = store.participants.insert(record).await;
        bus.publish(Topic::ParticipantCreated, &created);
        Ok(created.into())
    }

    /// Merge the supplied fields into an existing participant.
    async fn update_participant(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateParticipantInput,
    ) -> Result<Participant> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let bus = ctx.data::<EventBus>()?;
        let participant_id = parse_id(&id, ParticipantId::parse)?;

        let mut record = store
            .participants
            .find(participant_id)
            .await
            .ok_or_else(|| ApiError::not_found("participant", &id).extend())?;
        if let Some(user_id) = input.user_id {
            record.user_id = parse_id(&user_id, UserId::parse)?;
        }
        if let Some(event_id) = input.event_id {
            record.event_id = parse_id(&event_id, EventId::parse)?;
        }

        let updated = store
            .participants
            .replace(participant_id, record)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        bus.publish(Topic::ParticipantUpdated, &updated);
        Ok(updated.into())
    }

    /// Delete a participant, returning the pre-removal snapshot.
    async fn delete_participant(&self, ctx: &Context<'_>, id: ID) -> Result<Participant> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let participant_id = parse_id(&id, ParticipantId::parse)?;
        let removed = store
            .participants
            .remove(participant_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(removed.into())
    }

    /// Delete every participant and return the count removed.
    async fn delete_all_participants(&self, ctx: &Context<'_>) -> Result<u32> {
        let store = ctx.data::<Arc<EntityStore>>()?;
        let removed = store.participants.clear().await;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }
}
