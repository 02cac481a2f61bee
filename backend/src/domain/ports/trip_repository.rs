//! Port abstraction for persisting trips.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Trip, TripId, UserId};

use super::PersistenceError;

/// Port for storing and retrieving trips.
///
/// Conditional writes follow the same contract as
/// [`UserRepository`](super::UserRepository).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Fetch a trip by id.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, PersistenceError>;

    /// All trips owned by `user_id`, earliest start first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, PersistenceError>;

    /// Insert a new trip.
    async fn insert(&self, trip: &Trip) -> Result<Trip, PersistenceError>;

    /// Replace a stored trip if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        trip: &Trip,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Trip, PersistenceError>;

    /// Delete a trip and its itineraries, activities, expenses and reminders.
    async fn delete(
        &self,
        id: &TripId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
