//! Behaviour tests for record ownership across the trip hierarchy.
//!
//! Scenarios run against a real listener backed by the in-memory store and
//! exercise the API only through HTTP.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "support/travel_world.rs"]
mod travel_world;

use actix_web::http::Method;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use travel_world::{SharedWorld, WorldFixture, create, record, send, sign_up};

#[fixture]
fn world() -> WorldFixture {
    travel_world::world()
}

fn traveller(world: &SharedWorld) -> String {
    if let Some(bearer) = world.borrow().traveller.clone() {
        return bearer;
    }
    let bearer = sign_up(world, "traveller@example.com");
    world.borrow_mut().traveller = Some(bearer.clone());
    bearer
}

fn trip_payload(title: &str) -> Value {
    json!({
        "title": title,
        "destination": "Portugal",
        "startDate": "2023-03-01",
        "endDate": "2023-03-10",
    })
}

fn owned_trip(world: &SharedWorld) -> String {
    let bearer = traveller(world);
    let trip_id = create(world, "/api/trips", &bearer, trip_payload("Lisbon"));
    world.borrow_mut().trip_id = Some(trip_id.clone());
    trip_id
}

fn trip_path(world: &SharedWorld) -> String {
    let trip_id = world.borrow().trip_id.clone().expect("trip id");
    format!("/api/trips/{trip_id}")
}

fn reminder_path(world: &SharedWorld) -> String {
    let reminder_id = world.borrow().reminder_id.clone().expect("reminder id");
    format!("/api/reminders/{reminder_id}")
}

fn last_response(world: &SharedWorld) -> (u16, Value) {
    let ctx = world.borrow();
    (
        ctx.last_status.expect("response status"),
        ctx.last_body.clone().expect("response body"),
    )
}

#[given("a running travel server")]
fn a_running_travel_server(world: &WorldFixture) {
    let _ = world;
}

#[given("the traveller owns a trip")]
fn the_traveller_owns_a_trip(world: &WorldFixture) {
    owned_trip(&world.world());
}

#[given("a stranger is signed in")]
fn a_stranger_is_signed_in(world: &WorldFixture) {
    let world = world.world();
    let bearer = sign_up(&world, "stranger@example.com");
    world.borrow_mut().stranger = Some(bearer);
}

#[given("the traveller owns an activity")]
fn the_traveller_owns_an_activity(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let trip_id = owned_trip(&world);
    let itinerary_id = create(
        &world,
        "/api/itineraries",
        &bearer,
        json!({ "tripId": trip_id, "date": "2023-03-02" }),
    );
    let activity_id = create(
        &world,
        "/api/activities",
        &bearer,
        json!({
            "itineraryId": itinerary_id,
            "title": "Tram 28",
            "location": "Alfama",
            "startTime": "2023-03-02T10:00:00Z",
            "endTime": "2023-03-02T11:00:00Z",
            "category": "TRANSPORT",
        }),
    );
    world.borrow_mut().activity_id = Some(activity_id);
}

#[given("the traveller has a reminder on a trip")]
fn the_traveller_has_a_reminder_on_a_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let trip_id = owned_trip(&world);
    let reminder_id = create(
        &world,
        "/api/reminders",
        &bearer,
        json!({
            "tripId": trip_id,
            "message": "Pack sunscreen",
            "time": "2023-02-28T09:00:00Z",
        }),
    );
    world.borrow_mut().reminder_id = Some(reminder_id);
}

#[given("the traveller owns a second trip")]
fn the_traveller_owns_a_second_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let trip_id = create(&world, "/api/trips", &bearer, trip_payload("Porto"));
    world.borrow_mut().second_trip_id = Some(trip_id);
}

#[when("the stranger requests the trip")]
fn the_stranger_requests_the_trip(world: &WorldFixture) {
    let world = world.world();
    let stranger = world.borrow().stranger.clone();
    let path = trip_path(&world);
    record(&world, Method::GET, &path, stranger, None);
}

#[when("the traveller deletes the trip")]
fn the_traveller_deletes_the_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let path = trip_path(&world);
    record(&world, Method::DELETE, &path, Some(bearer), None);
    let (status, body) = last_response(&world);
    assert_eq!(status, 200, "{body}");
}

#[when("the traveller requests the trip")]
fn the_traveller_requests_the_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let path = trip_path(&world);
    record(&world, Method::GET, &path, Some(bearer), None);
}

#[when("the traveller records an expense with the amount {amount}")]
fn the_traveller_records_an_expense_with_the_amount(world: &WorldFixture, amount: String) {
    let world = world.world();
    let bearer = traveller(&world);
    let activity_id = world.borrow().activity_id.clone().expect("activity id");
    record(
        &world,
        Method::POST,
        "/api/expenses",
        Some(bearer),
        Some(json!({
            "activityId": activity_id,
            "title": "Ticket",
            "amount": amount.trim_matches('"'),
            "currency": "EUR",
        })),
    );
}

#[when("the traveller moves the reminder to the second trip")]
fn the_traveller_moves_the_reminder_to_the_second_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let second = world.borrow().second_trip_id.clone().expect("second trip id");
    let path = reminder_path(&world);
    record(
        &world,
        Method::PUT,
        &path,
        Some(bearer),
        Some(json!({ "tripId": second, "message": "Moved" })),
    );
}

#[then("the response is forbidden with {message}")]
fn the_response_is_forbidden_with(world: &WorldFixture, message: String) {
    let (status, body) = last_response(&world.world());
    assert_eq!(status, 403, "{body}");
    assert_eq!(body["success"], false);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(message.trim_matches('"'))
    );
}

#[then("the response is not found with {message}")]
fn the_response_is_not_found_with(world: &WorldFixture, message: String) {
    let (status, body) = last_response(&world.world());
    assert_eq!(status, 404, "{body}");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(message.trim_matches('"'))
    );
}

#[then("the stored expense amount is {amount}")]
fn the_stored_expense_amount_is(world: &WorldFixture, amount: i64) {
    let world = world.world();
    let (status, body) = last_response(&world);
    assert_eq!(status, 201, "{body}");
    let expense_id = body["data"]["id"].as_str().expect("expense id").to_owned();

    let bearer = traveller(&world);
    let (status, stored) = send(
        &world,
        Method::GET,
        &format!("/api/expenses/{expense_id}"),
        Some(bearer),
        None,
    );
    assert_eq!(status, 200, "{stored}");
    assert_eq!(stored["data"]["amount"].as_i64(), Some(amount));
}

#[then("the reminder still points at its original trip")]
fn the_reminder_still_points_at_its_original_trip(world: &WorldFixture) {
    let world = world.world();
    let bearer = traveller(&world);
    let original = world.borrow().trip_id.clone().expect("trip id");
    let path = reminder_path(&world);
    let (status, stored) = send(&world, Method::GET, &path, Some(bearer), None);
    assert_eq!(status, 200, "{stored}");
    assert_eq!(stored["data"]["tripId"].as_str(), Some(original.as_str()));
    assert_eq!(stored["data"]["message"], "Pack sunscreen");
}

#[scenario(
    path = "tests/features/travel_ownership.feature",
    name = "A stranger cannot read a trip"
)]
fn a_stranger_cannot_read_a_trip(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/travel_ownership.feature",
    name = "A deleted trip is no longer found"
)]
fn a_deleted_trip_is_no_longer_found(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/travel_ownership.feature",
    name = "Expense amounts sent as text are stored as integers"
)]
fn expense_amounts_sent_as_text_are_stored_as_integers(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/travel_ownership.feature",
    name = "A reminder cannot be moved to another trip"
)]
fn a_reminder_cannot_be_moved_to_another_trip(world: WorldFixture) {
    drop(world);
}
