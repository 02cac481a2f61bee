//! In-process implementation of every repository port.
//!
//! Used when no database URL is configured and by the end-to-end tests. The
//! store mirrors the PostgreSQL schema's guarantees: unique emails,
//! conditional writes on `updated_at`, and cascading deletes along the
//! ownership chain.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ActivityRepository, ExpenseRepository, ItineraryRepository, PersistenceError,
    ReminderRepository, RepositoryPorts, TripRepository, UserRepository,
};
use crate::domain::{
    Activity, ActivityId, Email, Expense, ExpenseId, Itinerary, ItineraryId, Owned, Reminder,
    ReminderId, Trip, TripId, User, UserId,
};

const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    trips: HashMap<TripId, Trip>,
    itineraries: HashMap<ItineraryId, Itinerary>,
    activities: HashMap<ActivityId, Activity>,
    expenses: HashMap<ExpenseId, Expense>,
    reminders: HashMap<ReminderId, Reminder>,
}

impl Tables {
    fn trip_owner(&self, trip_id: &TripId) -> Option<UserId> {
        self.trips.get(trip_id).map(|trip| trip.user_id)
    }

    fn itinerary_owner(&self, itinerary_id: &ItineraryId) -> Option<UserId> {
        self.itineraries
            .get(itinerary_id)
            .and_then(|itinerary| self.trip_owner(&itinerary.trip_id))
    }

    fn activity_owner(&self, activity_id: &ActivityId) -> Option<UserId> {
        self.activities
            .get(activity_id)
            .and_then(|activity| self.itinerary_owner(&activity.itinerary_id))
    }

    fn email_taken_by_other(&self, email: &Email, id: &UserId) -> bool {
        self.users
            .values()
            .any(|user| user.email == *email && user.id != *id)
    }

    fn remove_activity(&mut self, id: &ActivityId) {
        self.activities.remove(id);
        self.expenses.retain(|_, expense| expense.activity_id != *id);
    }

    fn remove_itinerary(&mut self, id: &ItineraryId) {
        self.itineraries.remove(id);
        let children: Vec<ActivityId> = self
            .activities
            .values()
            .filter(|activity| activity.itinerary_id == *id)
            .map(|activity| activity.id)
            .collect();
        for child in children {
            self.remove_activity(&child);
        }
    }

    fn remove_trip(&mut self, id: &TripId) {
        self.trips.remove(id);
        self.reminders.retain(|_, reminder| reminder.trip_id != *id);
        let children: Vec<ItineraryId> = self
            .itineraries
            .values()
            .filter(|itinerary| itinerary.trip_id == *id)
            .map(|itinerary| itinerary.id)
            .collect();
        for child in children {
            self.remove_itinerary(&child);
        }
    }

    fn remove_user(&mut self, id: &UserId) {
        self.users.remove(id);
        self.reminders.retain(|_, reminder| reminder.user_id != *id);
        let children: Vec<TripId> = self
            .trips
            .values()
            .filter(|trip| trip.user_id == *id)
            .map(|trip| trip.id)
            .collect();
        for child in children {
            self.remove_trip(&child);
        }
    }
}

/// Check the optimistic-concurrency precondition for a stored record.
fn check_revision(
    stored: Option<DateTime<Utc>>,
    expected: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    match stored {
        None => Err(PersistenceError::missing()),
        Some(actual) if actual != expected => Err(PersistenceError::stale_write()),
        Some(_) => Ok(()),
    }
}

fn missing_parent(kind: &str) -> PersistenceError {
    PersistenceError::query(format!("foreign key violation: {kind} does not exist"))
}

/// Shared in-memory tables. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The persistence gateway backed by this store.
    pub fn repository_ports(&self) -> RepositoryPorts {
        let shared = Arc::new(self.clone());
        RepositoryPorts {
            users: shared.clone(),
            trips: shared.clone(),
            itineraries: shared.clone(),
            activities: shared.clone(),
            expenses: shared.clone(),
            reminders: shared,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, PersistenceError> {
        self.tables
            .read()
            .map_err(|_| PersistenceError::connection("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, PersistenceError> {
        self.tables
            .write()
            .map_err(|_| PersistenceError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, PersistenceError> {
        let mut tables = self.write()?;
        if tables.email_taken_by_other(&user.email, &user.id) {
            return Err(PersistenceError::duplicate(EMAIL_CONSTRAINT));
        }
        if tables.users.contains_key(&user.id) {
            return Err(PersistenceError::duplicate("users_pkey"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(
        &self,
        user: &User,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<User, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.users.get(&user.id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        if tables.email_taken_by_other(&user.email, &user.id) {
            return Err(PersistenceError::duplicate(EMAIL_CONSTRAINT));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(
        &self,
        id: &UserId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.users.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.remove_user(id);
        Ok(())
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, PersistenceError> {
        Ok(self.read()?.trips.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, PersistenceError> {
        let mut trips: Vec<Trip> = self
            .read()?
            .trips
            .values()
            .filter(|trip| trip.user_id == *user_id)
            .cloned()
            .collect();
        trips.sort_by_key(|trip| (trip.start_date, trip.created_at));
        Ok(trips)
    }

    async fn insert(&self, trip: &Trip) -> Result<Trip, PersistenceError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&trip.user_id) {
            return Err(missing_parent("user"));
        }
        tables.trips.insert(trip.id, trip.clone());
        Ok(trip.clone())
    }

    async fn update(
        &self,
        trip: &Trip,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Trip, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.trips.get(&trip.id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.trips.insert(trip.id, trip.clone());
        Ok(trip.clone())
    }

    async fn delete(
        &self,
        id: &TripId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.trips.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.remove_trip(id);
        Ok(())
    }
}

#[async_trait]
impl ItineraryRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &ItineraryId,
    ) -> Result<Option<Owned<Itinerary>>, PersistenceError> {
        let tables = self.read()?;
        Ok(tables.itineraries.get(id).and_then(|itinerary| {
            tables
                .trip_owner(&itinerary.trip_id)
                .map(|owner| Owned::new(itinerary.clone(), owner))
        }))
    }

    async fn list_by_trip(
        &self,
        trip_id: &TripId,
    ) -> Result<Vec<Owned<Itinerary>>, PersistenceError> {
        let tables = self.read()?;
        let Some(owner) = tables.trip_owner(trip_id) else {
            return Ok(Vec::new());
        };
        let mut listed: Vec<Owned<Itinerary>> = tables
            .itineraries
            .values()
            .filter(|itinerary| itinerary.trip_id == *trip_id)
            .map(|itinerary| Owned::new(itinerary.clone(), owner))
            .collect();
        listed.sort_by_key(|item| (item.record.date, item.record.created_at));
        Ok(listed)
    }

    async fn insert(&self, itinerary: &Itinerary) -> Result<Itinerary, PersistenceError> {
        let mut tables = self.write()?;
        if !tables.trips.contains_key(&itinerary.trip_id) {
            return Err(missing_parent("trip"));
        }
        tables.itineraries.insert(itinerary.id, itinerary.clone());
        Ok(itinerary.clone())
    }

    async fn update(
        &self,
        itinerary: &Itinerary,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Itinerary, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables
                .itineraries
                .get(&itinerary.id)
                .map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.itineraries.insert(itinerary.id, itinerary.clone());
        Ok(itinerary.clone())
    }

    async fn delete(
        &self,
        id: &ItineraryId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.itineraries.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.remove_itinerary(id);
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &ActivityId,
    ) -> Result<Option<Owned<Activity>>, PersistenceError> {
        let tables = self.read()?;
        Ok(tables.activities.get(id).and_then(|activity| {
            tables
                .itinerary_owner(&activity.itinerary_id)
                .map(|owner| Owned::new(activity.clone(), owner))
        }))
    }

    async fn list_by_itinerary(
        &self,
        itinerary_id: &ItineraryId,
    ) -> Result<Vec<Owned<Activity>>, PersistenceError> {
        let tables = self.read()?;
        let Some(owner) = tables.itinerary_owner(itinerary_id) else {
            return Ok(Vec::new());
        };
        let mut listed: Vec<Owned<Activity>> = tables
            .activities
            .values()
            .filter(|activity| activity.itinerary_id == *itinerary_id)
            .map(|activity| Owned::new(activity.clone(), owner))
            .collect();
        listed.sort_by_key(|item| (item.record.start_time, item.record.created_at));
        Ok(listed)
    }

    async fn insert(&self, activity: &Activity) -> Result<Activity, PersistenceError> {
        let mut tables = self.write()?;
        if !tables.itineraries.contains_key(&activity.itinerary_id) {
            return Err(missing_parent("itinerary"));
        }
        tables.activities.insert(activity.id, activity.clone());
        Ok(activity.clone())
    }

    async fn update(
        &self,
        activity: &Activity,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Activity, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables
                .activities
                .get(&activity.id)
                .map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.activities.insert(activity.id, activity.clone());
        Ok(activity.clone())
    }

    async fn delete(
        &self,
        id: &ActivityId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.activities.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.remove_activity(id);
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ExpenseId) -> Result<Option<Owned<Expense>>, PersistenceError> {
        let tables = self.read()?;
        Ok(tables.expenses.get(id).and_then(|expense| {
            tables
                .activity_owner(&expense.activity_id)
                .map(|owner| Owned::new(expense.clone(), owner))
        }))
    }

    async fn list_by_activity(
        &self,
        activity_id: &ActivityId,
    ) -> Result<Vec<Owned<Expense>>, PersistenceError> {
        let tables = self.read()?;
        let Some(owner) = tables.activity_owner(activity_id) else {
            return Ok(Vec::new());
        };
        let mut listed: Vec<Owned<Expense>> = tables
            .expenses
            .values()
            .filter(|expense| expense.activity_id == *activity_id)
            .map(|expense| Owned::new(expense.clone(), owner))
            .collect();
        listed.sort_by_key(|item| item.record.created_at);
        Ok(listed)
    }

    async fn insert(&self, expense: &Expense) -> Result<Expense, PersistenceError> {
        let mut tables = self.write()?;
        if !tables.activities.contains_key(&expense.activity_id) {
            return Err(missing_parent("activity"));
        }
        tables.expenses.insert(expense.id, expense.clone());
        Ok(expense.clone())
    }

    async fn update(
        &self,
        expense: &Expense,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Expense, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables
                .expenses
                .get(&expense.id)
                .map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.expenses.insert(expense.id, expense.clone());
        Ok(expense.clone())
    }

    async fn delete(
        &self,
        id: &ExpenseId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.expenses.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.expenses.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ReminderRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, PersistenceError> {
        Ok(self.read()?.reminders.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Reminder>, PersistenceError> {
        let mut reminders: Vec<Reminder> = self
            .read()?
            .reminders
            .values()
            .filter(|reminder| reminder.user_id == *user_id)
            .cloned()
            .collect();
        reminders.sort_by_key(|reminder| (reminder.time, reminder.created_at));
        Ok(reminders)
    }

    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, PersistenceError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&reminder.user_id) {
            return Err(missing_parent("user"));
        }
        if !tables.trips.contains_key(&reminder.trip_id) {
            return Err(missing_parent("trip"));
        }
        tables.reminders.insert(reminder.id, reminder.clone());
        Ok(reminder.clone())
    }

    async fn update(
        &self,
        reminder: &Reminder,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Reminder, PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables
                .reminders
                .get(&reminder.id)
                .map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.reminders.insert(reminder.id, reminder.clone());
        Ok(reminder.clone())
    }

    async fn delete(
        &self,
        id: &ReminderId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut tables = self.write()?;
        check_revision(
            tables.reminders.get(id).map(|stored| stored.updated_at),
            expected_updated_at,
        )?;
        tables.reminders.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
