//! Integration tests for the GraphQL schema.
//!
//! Tests drive `Schema::execute` / `execute_stream` directly, with an
//! in-process bus and an empty or seeded store, so no TCP server or broker
//! is needed.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use rally_bus::{EventBus, Topic};
use rally_graphql::{RallySchema, build_schema};
use rally_store::{EntityStore, Fixture};
use serde_json::Value;

fn test_schema() -> (RallySchema, EventBus, Arc<EntityStore>) {
    let store = Arc::new(EntityStore::new());
    let bus = EventBus::in_process(16);
    let schema = build_schema(Arc::clone(&store), bus.clone());
    (schema, bus, store)
}

/// Execute a document that must succeed and return its data as JSON.
async fn execute(schema: &RallySchema, document: &str) -> Value {
    let response = schema.execute(document).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors for {document}: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

/// Execute a document that must fail and return the first error's
/// extensions code.
async fn execute_expect_code(schema: &RallySchema, document: &str) -> String {
    let response = schema.execute(document).await;
    assert!(
        !response.errors.is_empty(),
        "expected an error for {document}"
    );
    let error = response.errors.into_iter().next().unwrap();
    let serialized = serde_json::to_value(&error).unwrap();
    serialized["extensions"]["code"]
        .as_str()
        .unwrap_or_default()
        .to_owned()
}

async fn create_user(schema: &RallySchema, username: &str, email: &str) -> Value {
    let document = format!(
        r#"mutation {{ createUser(input: {{username: "{username}", email: "{email}"}}) {{ id username email }} }}"#
    );
    let mut data = execute(schema, &document).await;
    data["createUser"].take()
}

async fn create_location(schema: &RallySchema, name: &str, lat: f64, lng: f64) -> Value {
    let document = format!(
        r#"mutation {{ createLocation(input: {{name: "{name}", description: "somewhere", latitude: {lat}, longitude: {lng}}}) {{ id name description latitude longitude }} }}"#
    );
    let mut data = execute(schema, &document).await;
    data["createLocation"].take()
}

async fn create_event(schema: &RallySchema, user_id: &str, location_id: &str) -> Value {
    let document = format!(
        r#"mutation {{ createEvent(input: {{
            title: "Rust Meetup",
            description: "Monthly meetup",
            date: "2026-09-12",
            startTime: "18:30:00",
            endTime: "21:00:00",
            locationId: "{location_id}",
            userId: "{user_id}"
        }}) {{ id title description date startTime endTime locationId userId }} }}"#
    );
    let mut data = execute(schema, &document).await;
    data["createEvent"].take()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch_returns_equal_record() {
    let (schema, _bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap();

    let fetched = execute(
        &schema,
        &format!(r#"{{ user(id: "{id}") {{ id username email }} }}"#),
    )
    .await;
    assert_eq!(fetched["user"], created);
}

#[tokio::test]
async fn listing_preserves_insertion_order() {
    let (schema, _bus, _store) = test_schema();
    let _ = create_user(&schema, "first", "first@example.com").await;
    let _ = create_user(&schema, "second", "second@example.com").await;

    let data = execute(&schema, "{ users { username } }").await;
    let names: Vec<&str> = data["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test]
async fn create_event_returns_the_single_created_record() {
    let (schema, _bus, _store) = test_schema();
    let user = create_user(&schema, "ada", "ada@example.com").await;
    let location = create_location(&schema, "Park", 1.0, 2.0).await;

    let event = create_event(
        &schema,
        user["id"].as_str().unwrap(),
        location["id"].as_str().unwrap(),
    )
    .await;

    // A single object, not a collection.
    assert!(event.is_object());
    assert_eq!(event["title"], "Rust Meetup");
    assert_eq!(event["date"], "2026-09-12");
    assert!(event["id"].as_str().is_some());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_with_empty_payload_is_a_noop() {
    let (schema, _bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap();

    let data = execute(
        &schema,
        &format!(r#"mutation {{ updateUser(id: "{id}", input: {{}}) {{ id username email }} }}"#),
    )
    .await;
    assert_eq!(data["updateUser"], created);
}

#[tokio::test]
async fn update_merges_exactly_the_supplied_fields() {
    let (schema, _bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap();

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ updateUser(id: "{id}", input: {{email: "ada@rally.dev"}}) {{ id username email }} }}"#
        ),
    )
    .await;
    assert_eq!(data["updateUser"]["email"], "ada@rally.dev");
    assert_eq!(data["updateUser"]["username"], "ada");

    // The merge is persisted, not just echoed.
    let fetched = execute(
        &schema,
        &format!(r#"{{ user(id: "{id}") {{ username email }} }}"#),
    )
    .await;
    assert_eq!(fetched["user"]["email"], "ada@rally.dev");
    assert_eq!(fetched["user"]["username"], "ada");
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let (schema, _bus, _store) = test_schema();
    let absent = rally_types::UserId::new();
    let code = execute_expect_code(
        &schema,
        &format!(r#"mutation {{ updateUser(id: "{absent}", input: {{username: "x"}}) {{ id }} }}"#),
    )
    .await;
    assert_eq!(code, "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_snapshot_then_fetch_is_not_found() {
    let (schema, _bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap();

    let data = execute(
        &schema,
        &format!(r#"mutation {{ deleteUser(id: "{id}") {{ id username email }} }}"#),
    )
    .await;
    assert_eq!(data["deleteUser"], created);

    let code = execute_expect_code(&schema, &format!(r#"{{ user(id: "{id}") {{ id }} }}"#)).await;
    assert_eq!(code, "NOT_FOUND");
}

#[tokio::test]
async fn delete_missing_id_is_not_found_never_silent() {
    let (schema, _bus, _store) = test_schema();
    let absent = rally_types::UserId::new();
    let code = execute_expect_code(
        &schema,
        &format!(r#"mutation {{ deleteUser(id: "{absent}") {{ id }} }}"#),
    )
    .await;
    assert_eq!(code, "NOT_FOUND");
}

#[tokio::test]
async fn malformed_id_is_a_typed_invalid_id_error() {
    let (schema, _bus, _store) = test_schema();
    let code = execute_expect_code(&schema, r#"{ user(id: "not-a-uuid") { id } }"#).await;
    assert_eq!(code, "INVALID_ID");
}

#[tokio::test]
async fn delete_all_returns_prior_count_and_empties() {
    let (schema, _bus, _store) = test_schema();
    for i in 0..3 {
        let _ = create_user(&schema, &format!("user{i}"), "u@example.com").await;
    }

    let data = execute(&schema, "mutation { deleteAllUsers }").await;
    assert_eq!(data["deleteAllUsers"], 3);

    let listed = execute(&schema, "{ users { id } }").await;
    assert_eq!(listed["users"].as_array().unwrap().len(), 0);

    // Emptying an already-empty collection never fails.
    let again = execute(&schema, "mutation { deleteAllUsers }").await;
    assert_eq!(again["deleteAllUsers"], 0);
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dangling_user_reference_resolves_to_null_not_error() {
    let (schema, _bus, _store) = test_schema();
    let location = create_location(&schema, "Park", 1.0, 2.0).await;
    let absent_user = rally_types::UserId::new();
    let event = create_event(
        &schema,
        &absent_user.to_string(),
        location["id"].as_str().unwrap(),
    )
    .await;
    let event_id = event["id"].as_str().unwrap();

    let data = execute(
        &schema,
        &format!(r#"{{ event(id: "{event_id}") {{ title user {{ id }} location {{ name }} }} }}"#),
    )
    .await;
    assert_eq!(data["event"]["user"], Value::Null);
    assert_eq!(data["event"]["location"]["name"], "Park");
}

#[tokio::test]
async fn participants_filter_by_event() {
    let (schema, _bus, _store) = test_schema();
    let user = create_user(&schema, "ada", "ada@example.com").await;
    let location = create_location(&schema, "Park", 1.0, 2.0).await;
    let user_id = user["id"].as_str().unwrap();
    let location_id = location["id"].as_str().unwrap();

    let event_a = create_event(&schema, user_id, location_id).await;
    let event_b = create_event(&schema, user_id, location_id).await;
    let event_a_id = event_a["id"].as_str().unwrap();
    let event_b_id = event_b["id"].as_str().unwrap();

    for event_id in [event_a_id, event_a_id, event_b_id] {
        let _ = execute(
            &schema,
            &format!(
                r#"mutation {{ createParticipant(input: {{userId: "{user_id}", eventId: "{event_id}"}}) {{ id }} }}"#
            ),
        )
        .await;
    }

    let data = execute(
        &schema,
        &format!(r#"{{ event(id: "{event_a_id}") {{ participants {{ eventId }} }} }}"#),
    )
    .await;
    let participants = data["event"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    for participant in participants {
        assert_eq!(participant["eventId"].as_str(), Some(event_a_id));
    }
}

#[tokio::test]
async fn deleting_a_location_nulls_the_relation_but_keeps_the_event() {
    let (schema, _bus, _store) = test_schema();
    let user = create_user(&schema, "ada", "ada@example.com").await;
    let location = create_location(&schema, "Park", 1.0, 2.0).await;
    let location_id = location["id"].as_str().unwrap();
    let event = create_event(&schema, user["id"].as_str().unwrap(), location_id).await;
    let event_id = event["id"].as_str().unwrap();

    // Before the delete the relation returns the location's fields exactly.
    let before = execute(
        &schema,
        &format!(
            r#"{{ event(id: "{event_id}") {{ location {{ id name description latitude longitude }} }} }}"#
        ),
    )
    .await;
    assert_eq!(before["event"]["location"], location);

    let _ = execute(
        &schema,
        &format!(r#"mutation {{ deleteLocation(id: "{location_id}") {{ id }} }}"#),
    )
    .await;

    // The event survives with a dangling reference resolving to null.
    let after = execute(
        &schema,
        &format!(
            r#"{{ event(id: "{event_id}") {{ title locationId location {{ id }} }} }}"#
        ),
    )
    .await;
    assert_eq!(after["event"]["title"], "Rust Meetup");
    assert_eq!(after["event"]["locationId"].as_str(), Some(location_id));
    assert_eq!(after["event"]["location"], Value::Null);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn subscriber_before_create_receives_exactly_one_notification() {
    let (schema, bus, _store) = test_schema();
    let mut rx = bus.subscribe(Topic::UserCreated);

    let created = create_user(&schema, "ada", "ada@example.com").await;

    let payload = rx.try_recv().unwrap();
    assert_eq!(payload["username"], "ada");
    assert_eq!(payload["id"].as_str(), created["id"].as_str());
    assert!(rx.try_recv().is_err(), "exactly one notification expected");
}

#[tokio::test]
async fn subscriber_after_create_receives_nothing_for_it() {
    let (schema, bus, _store) = test_schema();
    let _ = create_user(&schema, "ada", "ada@example.com").await;

    let mut rx = bus.subscribe(Topic::UserCreated);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn deletes_publish_no_notification_on_any_topic() {
    let (schema, bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap();

    let mut receivers: Vec<_> = Topic::ALL.into_iter().map(|t| bus.subscribe(t)).collect();

    let _ = execute(
        &schema,
        &format!(r#"mutation {{ deleteUser(id: "{id}") {{ id }} }}"#),
    )
    .await;
    let _ = execute(&schema, "mutation { deleteAllUsers }").await;

    for rx in &mut receivers {
        assert!(rx.try_recv().is_err(), "deletes must publish nothing");
    }
}

#[tokio::test]
async fn user_updated_subscription_yields_the_merged_record() {
    let (schema, _bus, _store) = test_schema();
    let created = create_user(&schema, "ada", "ada@example.com").await;
    let id = created["id"].as_str().unwrap().to_owned();

    let mut stream =
        schema.execute_stream("subscription { userUpdated { id username email } }");
    let first = tokio::spawn(async move { stream.next().await });

    // Let the subscription register its bus receiver before mutating.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let _ = execute(
        &schema,
        &format!(r#"mutation {{ updateUser(id: "{id}", input: {{email: "ada@rally.dev"}}) {{ id }} }}"#),
    )
    .await;

    let response = tokio::time::timeout(Duration::from_secs(2), first)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["userUpdated"]["id"].as_str(), Some(id.as_str()));
    assert_eq!(data["userUpdated"]["email"], "ada@rally.dev");
    assert_eq!(data["userUpdated"]["username"], "ada");
}

// ---------------------------------------------------------------------------
// Fixture-seeded store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_store_serves_queries_and_relations() {
    let fixture = Fixture::parse(
        r#"{
            "users": [
                {"id": "01890b2e-9d6a-7c3f-8a54-2f1d3c4b5a69",
                 "username": "ada", "email": "ada@example.com"}
            ],
            "locations": [
                {"id": "01890b2e-9d6a-7e21-b7c0-55aa66bb77cc",
                 "name": "Park", "description": "City park",
                 "latitude": 1.0, "longitude": 2.0}
            ],
            "events": [
                {"id": "01890b2e-9d6a-7f10-8e9d-0011aabbccdd",
                 "title": "Picnic", "description": "Annual picnic",
                 "date": "2026-06-01",
                 "start_time": "12:00:00", "end_time": "15:00:00",
                 "location_id": "01890b2e-9d6a-7e21-b7c0-55aa66bb77cc",
                 "user_id": "01890b2e-9d6a-7c3f-8a54-2f1d3c4b5a69"}
            ],
            "participants": [
                {"id": "01890b2e-9d6a-70aa-9c31-223344556677",
                 "user_id": "01890b2e-9d6a-7c3f-8a54-2f1d3c4b5a69",
                 "event_id": "01890b2e-9d6a-7f10-8e9d-0011aabbccdd"}
            ]
        }"#,
    )
    .unwrap();
    let store = Arc::new(EntityStore::from_fixture(fixture));
    let schema = build_schema(Arc::clone(&store), EventBus::in_process(16));

    let data = execute(
        &schema,
        r#"{ events { title user { username } location { name } participants { id } } }"#,
    )
    .await;
    let event = &data["events"][0];
    assert_eq!(event["title"], "Picnic");
    assert_eq!(event["user"]["username"], "ada");
    assert_eq!(event["location"]["name"], "Park");
    assert_eq!(event["participants"].as_array().unwrap().len(), 1);
}
