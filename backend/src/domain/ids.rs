//! Strongly typed entity identifiers.
//!
//! Every entity is keyed by a UUID. Wrapping each key in its own type stops a
//! trip id from being passed where an itinerary id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure to parse an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The input was empty.
    #[error("{kind} id must not be empty")]
    Empty {
        /// Entity name used in the message.
        kind: &'static str,
    },
    /// The input was not a UUID.
    #[error("{kind} id must be a valid UUID")]
    Invalid {
        /// Entity name used in the message.
        kind: &'static str,
    },
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its textual UUID form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty { kind: $kind });
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::Invalid { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Invalid { kind: $kind })
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a [`crate::domain::User`], the root of every ownership chain.
    UserId,
    "user"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::Trip`].
    TripId,
    "trip"
);
define_entity_id!(
    /// Identifier of an [`crate::domain::Itinerary`].
    ItineraryId,
    "itinerary"
);
define_entity_id!(
    /// Identifier of an [`crate::domain::Activity`].
    ActivityId,
    "activity"
);
define_entity_id!(
    /// Identifier of an [`crate::domain::Expense`].
    ExpenseId,
    "expense"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::Reminder`].
    ReminderId,
    "reminder"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty { kind: "trip" })]
    #[case("not-a-uuid", IdValidationError::Invalid { kind: "trip" })]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Invalid { kind: "trip" })]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(TripId::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_uuid_string() {
        let id = ExpenseId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }
}
