//! Trip data model.

use chrono::{DateTime, Utc};

use super::{Patch, TripId, UserId};

/// A trip planned by its owning user.
///
/// ## Invariants
/// - `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a trip. The owner is always the acting principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Partial update of a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripChanges {
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub destination: Patch<String>,
    pub start_date: Patch<DateTime<Utc>>,
    pub end_date: Patch<DateTime<Utc>>,
}
