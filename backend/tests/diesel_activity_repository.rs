//! Integration tests for the Diesel activity chain against embedded
//! PostgreSQL.
//!
//! Each test seeds a user, trip, itinerary and activity in a fresh database
//! and drives the adapters through their ports. Covered here: owner
//! resolution through the itinerary and trip joins, `updated_at`-conditional
//! writes and their zero-row disambiguation, and `ON DELETE CASCADE`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use travel_backend::domain::ports::{
    ActivityRepository, ExpenseRepository, ItineraryRepository, PersistenceError, TripRepository,
    UserRepository,
};
use travel_backend::domain::{
    Activity, ActivityCategory, ActivityDetail, ActivityId, Email, Expense, ExpenseId, Itinerary,
    ItineraryId, PasswordHash, Trip, TripId, User, UserId,
};
use travel_backend::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselExpenseRepository, DieselItineraryRepository,
    DieselTripRepository, DieselUserRepository, PoolConfig,
};

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{handle_cluster_setup_failure, provision_database};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

struct Seeded {
    owner: UserId,
    trip: Trip,
    activity: Activity,
}

struct TestContext {
    /// Runtime reused for every adapter call in the test.
    runtime: Runtime,
    trips: DieselTripRepository,
    activities: DieselActivityRepository,
    expenses: DieselExpenseRepository,
    seeded: Seeded,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        assert!(
            tokio::runtime::Handle::try_current().is_err(),
            "do not block on the context from inside a Tokio runtime"
        );
        self.runtime.block_on(future)
    }
}

fn seed(pool: &DbPool, runtime: &Runtime) -> Result<Seeded, String> {
    let owner = User {
        id: UserId::random(),
        name: "Ana".to_owned(),
        email: Email::new("ana@example.com").map_err(|err| err.to_string())?,
        password_hash: PasswordHash::new("$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA"),
        phone_number: None,
        profile_picture_url: None,
        created_at: at(1, 8),
        updated_at: at(1, 8),
    };
    let trip = Trip {
        id: TripId::random(),
        user_id: owner.id,
        title: "Lisbon".to_owned(),
        description: None,
        destination: "Portugal".to_owned(),
        start_date: at(1, 0),
        end_date: at(10, 0),
        created_at: at(1, 9),
        updated_at: at(1, 9),
    };
    let itinerary = Itinerary {
        id: ItineraryId::random(),
        trip_id: trip.id,
        date: at(2, 0),
        created_at: at(1, 10),
        updated_at: at(1, 10),
    };
    let activity = Activity {
        id: ActivityId::random(),
        itinerary_id: itinerary.id,
        title: "Tram 28".to_owned(),
        description: None,
        location: "Alfama".to_owned(),
        start_time: at(2, 10),
        end_time: at(2, 11),
        category: ActivityCategory::Transport,
        detail: ActivityDetail::new(),
        created_at: at(1, 11),
        updated_at: at(1, 11),
    };

    runtime.block_on(async {
        DieselUserRepository::new(pool.clone()).insert(&owner).await?;
        DieselTripRepository::new(pool.clone()).insert(&trip).await?;
        DieselItineraryRepository::new(pool.clone())
            .insert(&itinerary)
            .await?;
        DieselActivityRepository::new(pool.clone())
            .insert(&activity)
            .await?;
        Ok::<_, PersistenceError>(())
    })
    .map_err(|err| err.to_string())?;

    Ok(Seeded {
        owner: owner.id,
        trip,
        activity,
    })
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_database()?;
    let config = PoolConfig::new(database.url().to_string())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;
    let seeded = seed(&pool, &runtime)?;

    Ok(TestContext {
        runtime,
        trips: DieselTripRepository::new(pool.clone()),
        activities: DieselActivityRepository::new(pool.clone()),
        expenses: DieselExpenseRepository::new(pool),
        seeded,
        _database: database,
    })
}

#[fixture]
fn diesel_world() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn activity_owner_is_resolved_through_itinerary_and_trip(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: activity_owner_is_resolved_through_itinerary_and_trip skipped");
        return;
    };

    let found = ctx
        .block_on(ctx.activities.find_by_id(&ctx.seeded.activity.id))
        .expect("query succeeds")
        .expect("activity exists");

    assert_eq!(found.owner, ctx.seeded.owner);
    assert_eq!(found.record, ctx.seeded.activity);
}

#[rstest]
fn update_on_a_stale_revision_is_a_stale_write(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: update_on_a_stale_revision_is_a_stale_write skipped");
        return;
    };
    let stored = ctx.seeded.activity.clone();
    let first = Activity {
        title: "Tram 28 (first)".to_owned(),
        updated_at: stored.updated_at + Duration::minutes(1),
        ..stored.clone()
    };
    let second = Activity {
        title: "Tram 28 (second)".to_owned(),
        updated_at: stored.updated_at + Duration::minutes(2),
        ..stored.clone()
    };

    let written = ctx
        .block_on(ctx.activities.update(&first, stored.updated_at))
        .expect("first write wins");
    assert_eq!(written.title, "Tram 28 (first)");

    let err = ctx
        .block_on(ctx.activities.update(&second, stored.updated_at))
        .expect_err("second write observed an old revision");
    assert_eq!(err, PersistenceError::stale_write());

    let kept = ctx
        .block_on(ctx.activities.find_by_id(&stored.id))
        .expect("query succeeds")
        .expect("activity exists");
    assert_eq!(kept.record.title, "Tram 28 (first)");
}

#[rstest]
fn writes_to_a_deleted_activity_report_missing(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: writes_to_a_deleted_activity_report_missing skipped");
        return;
    };
    let stored = ctx.seeded.activity.clone();

    ctx.block_on(ctx.activities.delete(&stored.id, stored.updated_at))
        .expect("delete succeeds");

    let update = ctx
        .block_on(ctx.activities.update(&stored, stored.updated_at))
        .expect_err("row is gone");
    assert_eq!(update, PersistenceError::missing());

    let delete = ctx
        .block_on(ctx.activities.delete(&stored.id, stored.updated_at))
        .expect_err("row is gone");
    assert_eq!(delete, PersistenceError::missing());
}

#[rstest]
fn deleting_a_trip_cascades_to_activities_and_expenses(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: deleting_a_trip_cascades_to_activities_and_expenses skipped");
        return;
    };
    let expense = Expense {
        id: ExpenseId::random(),
        activity_id: ctx.seeded.activity.id,
        title: "Ticket".to_owned(),
        description: None,
        amount: 3,
        currency: "EUR".to_owned(),
        created_at: at(1, 12),
        updated_at: at(1, 12),
    };
    ctx.block_on(ctx.expenses.insert(&expense))
        .expect("insert succeeds");

    let trip = &ctx.seeded.trip;
    ctx.block_on(ctx.trips.delete(&trip.id, trip.updated_at))
        .expect("delete succeeds");

    let activity = ctx
        .block_on(ctx.activities.find_by_id(&ctx.seeded.activity.id))
        .expect("query succeeds");
    assert!(activity.is_none(), "activity should cascade with its trip");
    let expense = ctx
        .block_on(ctx.expenses.find_by_id(&expense.id))
        .expect("query succeeds");
    assert!(expense.is_none(), "expense should cascade with its trip");
}
