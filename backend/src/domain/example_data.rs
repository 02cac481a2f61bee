//! Deterministic example data.
//!
//! Each generated traveller gets one trip with a single itinerary day, one
//! activity on that day, an expense for the activity and a reminder the day
//! before departure. The same seed always yields the same names, emails and
//! ids, so a seed can be recognised on a second run and skipped.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use mockable::Clock;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CredentialError, CredentialHasher, PersistenceError, RepositoryPorts};
use crate::domain::{
    Activity, ActivityCategory, ActivityDetail, ActivityId, Email, Expense, ExpenseId, Itinerary,
    ItineraryId, PasswordHash, Reminder, ReminderId, Trip, TripId, User, UserId,
    UserValidationError,
};

const FIRST_NAMES: [&str; 8] = [
    "Ana", "Bayu", "Chloe", "Dewi", "Emeka", "Farah", "Goran", "Hana",
];
const LAST_NAMES: [&str; 8] = [
    "Silva", "Pratama", "Martin", "Lestari", "Okafor", "Haddad", "Petrov", "Sato",
];
const DESTINATIONS: [(&str, &str); 8] = [
    ("Lisbon", "Portugal"),
    ("Yogyakarta", "Indonesia"),
    ("Kyoto", "Japan"),
    ("Oaxaca", "Mexico"),
    ("Tbilisi", "Georgia"),
    ("Marrakesh", "Morocco"),
    ("Ljubljana", "Slovenia"),
    ("Hoi An", "Vietnam"),
];
const ACTIVITY_TITLES: [&str; 6] = [
    "Check in",
    "Street food tour",
    "Airport transfer",
    "Old town walk",
    "Market visit",
    "Free afternoon",
];
const CURRENCIES: [&str; 5] = ["EUR", "IDR", "JPY", "MXN", "USD"];

/// Whether a run wrote new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// Records were written.
    Applied,
    /// The seed's first traveller already exists; nothing was written.
    AlreadySeeded,
}

/// Result of attempting to apply example data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    pub seed: u64,
    pub user_count: usize,
    pub result: SeedingResult,
}

/// Errors raised while preparing or storing example data.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    #[error("generated email failed validation: {0}")]
    Email(#[from] UserValidationError),
    #[error("example password could not be hashed: {0}")]
    Hashing(#[from] CredentialError),
    #[error("example data persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// One traveller and everything they own.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleTraveller {
    pub user: User,
    pub trip: Trip,
    pub itinerary: Itinerary,
    pub activity: Activity,
    pub expense: Expense,
    pub reminder: Reminder,
}

/// Login address of the `index`-th traveller generated from `seed`.
pub fn example_email(seed: u64, index: usize) -> String {
    format!("traveller{index}.{seed}@example.com")
}

fn pick<'a, T>(rng: &mut SmallRng, items: &'a [T]) -> &'a T {
    // Every table above is non-empty.
    items.choose(rng).unwrap_or(&items[0])
}

fn next_uuid(rng: &mut SmallRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

fn traveller(
    rng: &mut SmallRng,
    seed: u64,
    index: usize,
    now: DateTime<Utc>,
    password_hash: &PasswordHash,
) -> Result<ExampleTraveller, UserValidationError> {
    let first = pick(rng, &FIRST_NAMES);
    let last = pick(rng, &LAST_NAMES);
    let user = User {
        id: UserId::from_uuid(next_uuid(rng)),
        name: format!("{first} {last}"),
        email: Email::new(example_email(seed, index))?,
        password_hash: password_hash.clone(),
        phone_number: None,
        profile_picture_url: None,
        created_at: now,
        updated_at: now,
    };

    let (city, country) = pick(rng, &DESTINATIONS);
    let start_date = now + Duration::days(rng.gen_range(7..60));
    let end_date = start_date + Duration::days(rng.gen_range(2..10));
    let trip = Trip {
        id: TripId::from_uuid(next_uuid(rng)),
        user_id: user.id,
        title: format!("{city} getaway"),
        description: Some(format!("A few days around {city}, {country}.")),
        destination: (*country).to_owned(),
        start_date,
        end_date,
        created_at: now,
        updated_at: now,
    };

    let itinerary = Itinerary {
        id: ItineraryId::from_uuid(next_uuid(rng)),
        trip_id: trip.id,
        date: start_date,
        created_at: now,
        updated_at: now,
    };

    let start_time = start_date + Duration::hours(rng.gen_range(8..18));
    let mut detail = ActivityDetail::new();
    detail.insert("note".to_owned(), "generated example".into());
    let activity = Activity {
        id: ActivityId::from_uuid(next_uuid(rng)),
        itinerary_id: itinerary.id,
        title: (*pick(rng, &ACTIVITY_TITLES)).to_owned(),
        description: None,
        location: (*city).to_owned(),
        start_time,
        end_time: start_time + Duration::hours(rng.gen_range(1..4)),
        category: *pick(rng, &ActivityCategory::ALL),
        detail,
        created_at: now,
        updated_at: now,
    };

    let expense = Expense {
        id: ExpenseId::from_uuid(next_uuid(rng)),
        activity_id: activity.id,
        title: format!("{} costs", activity.title),
        description: None,
        amount: rng.gen_range(10_000..5_000_000),
        currency: (*pick(rng, &CURRENCIES)).to_owned(),
        created_at: now,
        updated_at: now,
    };

    let reminder = Reminder {
        id: ReminderId::from_uuid(next_uuid(rng)),
        user_id: user.id,
        trip_id: trip.id,
        message: format!("Pack for {city}"),
        time: start_date - Duration::days(1),
        created_at: now,
        updated_at: now,
    };

    Ok(ExampleTraveller {
        user,
        trip,
        itinerary,
        activity,
        expense,
        reminder,
    })
}

/// Generate `count` travellers from `seed`, all sharing `password_hash`.
///
/// # Errors
/// Fails only if a generated email is rejected by [`Email::new`].
pub fn generate_travellers(
    seed: u64,
    count: usize,
    now: DateTime<Utc>,
    password_hash: &PasswordHash,
) -> Result<Vec<ExampleTraveller>, UserValidationError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|index| traveller(&mut rng, seed, index, now, password_hash))
        .collect()
}

/// Writes generated travellers through the repository ports.
#[derive(Clone)]
pub struct ExampleDataSeeder {
    repos: RepositoryPorts,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl ExampleDataSeeder {
    pub fn new(
        repos: RepositoryPorts,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            hasher,
            clock,
        }
    }

    /// Store `count` travellers for `seed`, each able to log in with
    /// `password`.
    ///
    /// A seed whose first traveller is already registered is reported as
    /// [`SeedingResult::AlreadySeeded`] and nothing is written.
    ///
    /// # Errors
    /// Returns [`ExampleDataSeedingError`] when hashing or any write fails.
    pub async fn seed(
        &self,
        seed: u64,
        count: usize,
        password: &str,
    ) -> Result<ExampleDataSeedOutcome, ExampleDataSeedingError> {
        let outcome = |result| ExampleDataSeedOutcome {
            seed,
            user_count: count,
            result,
        };
        if count == 0 {
            return Ok(outcome(SeedingResult::AlreadySeeded));
        }
        let marker = Email::new(example_email(seed, 0))?;
        if self.repos.users.find_by_email(&marker).await?.is_some() {
            return Ok(outcome(SeedingResult::AlreadySeeded));
        }

        let password_hash = self.hasher.hash(password).await?;
        let now = self.clock.utc().trunc_subsecs(6);
        for traveller in generate_travellers(seed, count, now, &password_hash)? {
            debug!(email = traveller.user.email.as_str(), "seeding traveller");
            self.repos.users.insert(&traveller.user).await?;
            self.repos.trips.insert(&traveller.trip).await?;
            self.repos.itineraries.insert(&traveller.itinerary).await?;
            self.repos.activities.insert(&traveller.activity).await?;
            self.repos.expenses.insert(&traveller.expense).await?;
            self.repos.reminders.insert(&traveller.reminder).await?;
        }
        Ok(outcome(SeedingResult::Applied))
    }
}
