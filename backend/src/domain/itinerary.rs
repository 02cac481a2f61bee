//! Itinerary data model: one planned day of a trip.

use chrono::{DateTime, Utc};

use super::{ItineraryId, TripId};

/// A day plan belonging to exactly one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub trip_id: TripId,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryDraft {
    pub trip_id: TripId,
    pub date: DateTime<Utc>,
}

/// Replacement values for an itinerary.
///
/// Both fields are required on update. `trip_id` must name the stored parent
/// trip; itineraries never move between trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryChanges {
    pub trip_id: TripId,
    pub date: DateTime<Utc>,
}
