//! Presence-tagged field updates.
//!
//! A partial update must tell "not supplied" apart from "supplied". `Option`
//! alone cannot do that for optional columns, where `None` is itself a value
//! (clear the column). [`Patch`] carries the distinction explicitly:
//!
//! - [`Patch::Absent`] keeps the stored value,
//! - [`Patch::Present`] replaces it, even with an empty string.
//!
//! When used in a request body, annotate the field with `#[serde(default)]` so
//! a missing key deserialises to `Absent`. For optional columns use
//! `Patch<Option<T>>`; an explicit JSON `null` then becomes `Present(None)`.

use serde::{Deserialize, Deserializer};

/// A single field of a partial update.
///
/// # Examples
/// ```
/// use travel_backend::domain::Patch;
///
/// let stored = "Lisbon".to_owned();
/// assert_eq!(Patch::Absent.apply(stored.clone()), "Lisbon");
/// assert_eq!(Patch::Present(String::new()).apply(stored), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The caller did not supply the field.
    Absent,
    /// The caller supplied this value.
    Present(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    /// Merge with the stored value: supplied values win.
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Absent => current,
            Self::Present(value) => value,
        }
    }

    /// Borrow the supplied value.
    pub const fn as_present(&self) -> Option<&T> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }

    /// Transform the supplied value, keeping absence.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Present(value) => Patch::Present(f(value)),
        }
    }

    /// Fallible transform of the supplied value.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Self::Absent => Ok(Patch::Absent),
            Self::Present(value) => f(value).map(Patch::Present),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Present)
    }
}
