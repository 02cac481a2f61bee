//! Reminder data model.
//!
//! Reminders reference both their user and a trip. The trip must belong to
//! the same user; this is checked when the reminder is created and again on
//! every update, where the caller must name the stored trip.

use chrono::{DateTime, Utc};

use super::{Patch, ReminderId, TripId, UserId};

/// A timed note attached to a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub user_id: UserId,
    pub trip_id: TripId,
    pub message: String,
    pub time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a reminder. The owner is always the acting principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    /// Owner named by the client, if any. Must be the acting principal.
    pub claimed_owner: Option<UserId>,
    pub trip_id: TripId,
    pub message: String,
    pub time: DateTime<Utc>,
}

/// Partial update of a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderChanges {
    /// Owner named by the client, if any. Must be the acting principal.
    pub claimed_owner: Option<UserId>,
    /// Must equal the stored trip id.
    pub trip_id: TripId,
    pub message: Patch<String>,
    pub time: Patch<DateTime<Utc>>,
}
