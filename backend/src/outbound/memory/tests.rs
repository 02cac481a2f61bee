//! Tests for the in-memory repository store.

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ActivityCategory, ActivityDetail, PasswordHash};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn user(email: &str) -> User {
    User {
        id: UserId::random(),
        name: "Ana".into(),
        email: Email::new(email).expect("valid email"),
        password_hash: PasswordHash::new("$argon2id$stub"),
        phone_number: None,
        profile_picture_url: None,
        created_at: at(1),
        updated_at: at(1),
    }
}

fn trip(owner: UserId) -> Trip {
    Trip {
        id: TripId::random(),
        user_id: owner,
        title: "Lisbon".into(),
        description: None,
        destination: "Portugal".into(),
        start_date: at(2),
        end_date: at(10),
        created_at: at(1),
        updated_at: at(1),
    }
}

fn itinerary(trip_id: TripId) -> Itinerary {
    Itinerary {
        id: ItineraryId::random(),
        trip_id,
        date: at(3),
        created_at: at(1),
        updated_at: at(1),
    }
}

fn activity(itinerary_id: ItineraryId) -> Activity {
    Activity {
        id: ActivityId::random(),
        itinerary_id,
        title: "Tram 28".into(),
        description: None,
        location: "Alfama".into(),
        start_time: at(4),
        end_time: at(5),
        category: ActivityCategory::Sightseeing,
        detail: ActivityDetail::new(),
        created_at: at(1),
        updated_at: at(1),
    }
}

fn expense(activity_id: ActivityId) -> Expense {
    Expense {
        id: ExpenseId::random(),
        activity_id,
        title: "Ticket".into(),
        description: None,
        amount: 300,
        currency: "EUR".into(),
        created_at: at(1),
        updated_at: at(1),
    }
}

fn reminder(user_id: UserId, trip_id: TripId) -> Reminder {
    Reminder {
        id: ReminderId::random(),
        user_id,
        trip_id,
        message: "Pack sunscreen".into(),
        time: at(6),
        created_at: at(1),
        updated_at: at(1),
    }
}

struct Seeded {
    ports: RepositoryPorts,
    user: User,
    trip: Trip,
    itinerary: Itinerary,
    activity: Activity,
    expense: Expense,
    reminder: Reminder,
}

#[fixture]
async fn seeded() -> Seeded {
    let ports = InMemoryStore::new().repository_ports();
    let user = ports.users.insert(&user("ana@example.com")).await.expect("user");
    let trip = ports.trips.insert(&trip(user.id)).await.expect("trip");
    let itinerary = ports
        .itineraries
        .insert(&itinerary(trip.id))
        .await
        .expect("itinerary");
    let activity = ports
        .activities
        .insert(&activity(itinerary.id))
        .await
        .expect("activity");
    let expense = ports
        .expenses
        .insert(&expense(activity.id))
        .await
        .expect("expense");
    let reminder = ports
        .reminders
        .insert(&reminder(user.id, trip.id))
        .await
        .expect("reminder");
    Seeded {
        ports,
        user,
        trip,
        itinerary,
        activity,
        expense,
        reminder,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let err = seeded
        .ports
        .users
        .insert(&user("ana@example.com"))
        .await
        .expect_err("duplicate email");
    assert_eq!(err, PersistenceError::duplicate(EMAIL_CONSTRAINT));
}

#[rstest]
#[tokio::test]
async fn update_cannot_take_another_users_email(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let other = seeded
        .ports
        .users
        .insert(&user("bo@example.com"))
        .await
        .expect("second user");
    let mut renamed = other.clone();
    renamed.email = seeded.user.email.clone();
    let err = seeded
        .ports
        .users
        .update(&renamed, other.updated_at)
        .await
        .expect_err("email taken");
    assert_eq!(err, PersistenceError::duplicate(EMAIL_CONSTRAINT));
}

#[rstest]
#[tokio::test]
async fn owners_resolve_through_parents(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let found = seeded
        .ports
        .expenses
        .find_by_id(&seeded.expense.id)
        .await
        .expect("lookup")
        .expect("expense present");
    assert_eq!(found.owner, seeded.user.id);
    assert_eq!(found.record, seeded.expense);

    let listed = seeded
        .ports
        .activities
        .list_by_itinerary(&seeded.itinerary.id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner, seeded.user.id);
}

#[rstest]
#[tokio::test]
async fn stale_revision_is_rejected(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let mut changed = seeded.trip.clone();
    changed.title = "Porto".into();
    changed.updated_at = at(2);
    let stored = seeded
        .ports
        .trips
        .update(&changed, seeded.trip.updated_at)
        .await
        .expect("first write wins");
    assert_eq!(stored.title, "Porto");

    let err = seeded
        .ports
        .trips
        .update(&changed, seeded.trip.updated_at)
        .await
        .expect_err("second write is stale");
    assert_eq!(err, PersistenceError::stale_write());
}

#[rstest]
#[tokio::test]
async fn writes_to_absent_records_report_missing(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let err = seeded
        .ports
        .reminders
        .delete(&ReminderId::random(), at(1))
        .await
        .expect_err("absent");
    assert_eq!(err, PersistenceError::missing());
}

#[rstest]
#[tokio::test]
async fn deleting_a_trip_cascades(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    seeded
        .ports
        .trips
        .delete(&seeded.trip.id, seeded.trip.updated_at)
        .await
        .expect("delete trip");

    let ports = &seeded.ports;
    assert!(ports.itineraries.find_by_id(&seeded.itinerary.id).await.expect("lookup").is_none());
    assert!(ports.activities.find_by_id(&seeded.activity.id).await.expect("lookup").is_none());
    assert!(ports.expenses.find_by_id(&seeded.expense.id).await.expect("lookup").is_none());
    assert!(ports.reminders.find_by_id(&seeded.reminder.id).await.expect("lookup").is_none());
    assert!(ports.users.find_by_id(&seeded.user.id).await.expect("lookup").is_some());
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_removes_everything_they_own(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    seeded
        .ports
        .users
        .delete(&seeded.user.id, seeded.user.updated_at)
        .await
        .expect("delete user");

    let ports = &seeded.ports;
    assert!(ports.trips.find_by_id(&seeded.trip.id).await.expect("lookup").is_none());
    assert!(ports.expenses.find_by_id(&seeded.expense.id).await.expect("lookup").is_none());
    assert!(ports
        .reminders
        .list_by_user(&seeded.user.id)
        .await
        .expect("list")
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn trips_are_listed_by_start_date(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let mut earlier = trip(seeded.user.id);
    earlier.start_date = at(0);
    earlier.end_date = at(1);
    seeded.ports.trips.insert(&earlier).await.expect("insert");

    let listed = seeded
        .ports
        .trips
        .list_by_user(&seeded.user.id)
        .await
        .expect("list");
    let ids: Vec<TripId> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![earlier.id, seeded.trip.id]);
}

#[rstest]
#[tokio::test]
async fn children_require_an_existing_parent() {
    let ports = InMemoryStore::new().repository_ports();
    let err = ports
        .itineraries
        .insert(&itinerary(TripId::random()))
        .await
        .expect_err("orphan");
    assert!(matches!(err, PersistenceError::Query { .. }));
}

#[rstest]
#[tokio::test]
async fn clones_share_state() {
    let store = InMemoryStore::new();
    let first = store.repository_ports();
    let second = store.repository_ports();
    let stored = first.users.insert(&user("cy@example.com")).await.expect("insert");
    let seen = second
        .users
        .find_by_email(&stored.email)
        .await
        .expect("lookup");
    assert_eq!(seen.map(|u| u.id), Some(stored.id));
}
