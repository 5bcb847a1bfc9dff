//! Live subscription operations.
//!
//! One subscription exists per `<entity><Created|Updated>` pair, yielding
//! the entity's full record whenever the corresponding mutation succeeds.
//! Delivery is push-based, at-most-once, with no replay: a subscriber
//! connected after a mutation never sees it. Dropping the subscription
//! releases its bus registration deterministically.

use async_graphql::{Context, Result, Subscription};
use futures::{Stream, StreamExt};
use rally_bus::{EventBus, Topic};
use rally_types as records;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::objects::{Event, Location, Participant, User};

/// Root of all subscription operations.
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Fires with the created user whenever a user is created.
    async fn user_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = User>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::User, User>(bus, Topic::UserCreated))
    }

    /// Fires with the updated user whenever a user is updated.
    async fn user_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = User>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::User, User>(bus, Topic::UserUpdated))
    }

    /// Fires with the created event whenever an event is created.
    async fn event_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Event>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Event, Event>(bus, Topic::EventCreated))
    }

    /// Fires with the updated event whenever an event is updated.
    async fn event_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Event>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Event, Event>(bus, Topic::EventUpdated))
    }

    /// Fires with the created location whenever a location is created.
    async fn location_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Location>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Location, Location>(
            bus,
            Topic::LocationCreated,
        ))
    }

    /// Fires with the updated location whenever a location is updated.
    async fn location_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Location>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Location, Location>(
            bus,
            Topic::LocationUpdated,
        ))
    }

    /// Fires with the created participant whenever a participant is
    /// created.
    async fn participant_created(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = Participant>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Participant, Participant>(
            bus,
            Topic::ParticipantCreated,
        ))
    }

    /// Fires with the updated participant whenever a participant is
    /// updated.
    async fn participant_updated(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = Participant>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(entity_stream::<records::Participant, Participant>(
            bus,
            Topic::ParticipantUpdated,
        ))
    }
}

/// Adapt one bus topic into a stream of GraphQL views.
///
/// Payloads that fail to decode as the expected record are logged and
/// skipped rather than terminating the subscription.
fn entity_stream<R, V>(bus: &EventBus, topic: Topic) -> impl Stream<Item = V> + use<R, V>
where
    R: DeserializeOwned,
    V: From<R>,
{
    bus.stream(topic).filter_map(move |payload| async move {
        match serde_json::from_value::<R>(payload) {
            Ok(record) => Some(V::from(record)),
            Err(e) => {
                warn!(topic = %topic, error = %e, "dropping undecodable notification payload");
                None
            }
        }
    })
}
