//! Port abstraction for persisting activities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Activity, ActivityId, ItineraryId, Owned};

use super::PersistenceError;

/// Port for storing and retrieving activities.
///
/// Reads resolve the owning user through itinerary and trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Fetch an activity together with its root owner.
    async fn find_by_id(
        &self,
        id: &ActivityId,
    ) -> Result<Option<Owned<Activity>>, PersistenceError>;

    /// Activities of an itinerary, ordered by start time.
    async fn list_by_itinerary(
        &self,
        itinerary_id: &ItineraryId,
    ) -> Result<Vec<Owned<Activity>>, PersistenceError>;

    /// Insert a new activity.
    async fn insert(&self, activity: &Activity) -> Result<Activity, PersistenceError>;

    /// Replace a stored activity if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        activity: &Activity,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Activity, PersistenceError>;

    /// Delete an activity and its expenses.
    async fn delete(
        &self,
        id: &ActivityId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
