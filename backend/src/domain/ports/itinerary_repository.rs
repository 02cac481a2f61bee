//! Port abstraction for persisting itineraries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Itinerary, ItineraryId, Owned, TripId};

use super::PersistenceError;

/// Port for storing and retrieving itineraries.
///
/// Reads resolve the owning user through the parent trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    /// Fetch an itinerary together with its root owner.
    async fn find_by_id(
        &self,
        id: &ItineraryId,
    ) -> Result<Option<Owned<Itinerary>>, PersistenceError>;

    /// Itineraries of a trip, ordered by date.
    async fn list_by_trip(
        &self,
        trip_id: &TripId,
    ) -> Result<Vec<Owned<Itinerary>>, PersistenceError>;

    /// Insert a new itinerary.
    async fn insert(&self, itinerary: &Itinerary) -> Result<Itinerary, PersistenceError>;

    /// Replace a stored itinerary if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        itinerary: &Itinerary,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Itinerary, PersistenceError>;

    /// Delete an itinerary and its activities and expenses.
    async fn delete(
        &self,
        id: &ItineraryId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
