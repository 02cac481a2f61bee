//! Activity data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ActivityId, ItineraryId, Patch};

/// Kind of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Accommodation,
    Food,
    Transport,
    Sightseeing,
    Shopping,
    Other,
}

impl ActivityCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Accommodation,
        Self::Food,
        Self::Transport,
        Self::Sightseeing,
        Self::Shopping,
        Self::Other,
    ];

    /// Stable wire and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accommodation => "ACCOMMODATION",
            Self::Food => "FOOD",
            Self::Transport => "TRANSPORT",
            Self::Sightseeing => "SIGHTSEEING",
            Self::Shopping => "SHOPPING",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ActivityCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Open key/value details of an activity (booking references, addresses...).
pub type ActivityDetail = Map<String, Value>;

/// A scheduled activity within an itinerary.
///
/// ## Invariants
/// - `start_time <= end_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub itinerary_id: ItineraryId,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: ActivityCategory,
    pub detail: ActivityDetail,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub itinerary_id: ItineraryId,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: ActivityCategory,
    pub detail: ActivityDetail,
}

/// Partial update of an activity.
///
/// A supplied `itinerary_id` is only compared with the stored parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityChanges {
    pub itinerary_id: Patch<ItineraryId>,
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub location: Patch<String>,
    pub start_time: Patch<DateTime<Utc>>,
    pub end_time: Patch<DateTime<Utc>>,
    pub category: Patch<ActivityCategory>,
    pub detail: Patch<ActivityDetail>,
}
