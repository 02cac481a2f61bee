//! Ownership resolution along the entity hierarchy.
//!
//! Every resource is owned by the user at the root of its parent chain:
//!
//! ```text
//! User -> Trip -> Itinerary -> Activity -> Expense
//!     \-> Reminder (also references a Trip of the same user)
//! ```
//!
//! [`OwnershipResolver`] is the single place that turns `(principal, target)`
//! into a [`Verdict`]. Absence is always decided before ownership, so a
//! missing id yields `NotFound` regardless of who asks.

use tracing::error;

use super::ports::{PersistenceError, RepositoryPorts};
use super::{
    Activity, ActivityId, Error, Expense, ExpenseId, Itinerary, ItineraryId, Reminder, ReminderId,
    Trip, TripId, User, UserId,
};

/// A record paired with the id of the user at the root of its chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Owned<T> {
    /// The stored record.
    pub record: T,
    /// `user_id` of the trip (or account) at the root of the chain.
    pub owner: UserId,
}

impl<T> Owned<T> {
    /// Pair a record with its owner.
    pub fn new(record: T, owner: UserId) -> Self {
        Self { record, owner }
    }
}

/// The six kinds of entity in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An account; owned by itself.
    User,
    /// Owned directly through `user_id`.
    Trip,
    /// Owned through its trip.
    Itinerary,
    /// Owned through itinerary then trip.
    Activity,
    /// Owned through activity, itinerary then trip.
    Expense,
    /// Owned through `user_id` and tied to one trip.
    Reminder,
}

impl EntityKind {
    /// Lower-case singular noun.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Trip => "trip",
            Self::Itinerary => "itinerary",
            Self::Activity => "activity",
            Self::Expense => "expense",
            Self::Reminder => "reminder",
        }
    }

    /// Lower-case plural noun.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Trip => "trips",
            Self::Itinerary => "itineraries",
            Self::Activity => "activities",
            Self::Expense => "expenses",
            Self::Reminder => "reminders",
        }
    }

    /// Capitalised singular noun for messages.
    pub const fn title(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Trip => "Trip",
            Self::Itinerary => "Itinerary",
            Self::Activity => "Activity",
            Self::Expense => "Expense",
            Self::Reminder => "Reminder",
        }
    }

    const fn article(self) -> &'static str {
        match self {
            Self::Itinerary | Self::Activity | Self::Expense => "an",
            _ => "a",
        }
    }
}

/// A reference to one entity, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    User(UserId),
    Trip(TripId),
    Itinerary(ItineraryId),
    Activity(ActivityId),
    Expense(ExpenseId),
    Reminder(ReminderId),
}

impl EntityRef {
    /// Kind of the referenced entity.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Trip(_) => EntityKind::Trip,
            Self::Itinerary(_) => EntityKind::Itinerary,
            Self::Activity(_) => EntityKind::Activity,
            Self::Expense(_) => EntityKind::Expense,
            Self::Reminder(_) => EntityKind::Reminder,
        }
    }
}

/// An entity fetched during resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedEntity {
    User(User),
    Trip(Trip),
    Itinerary(Itinerary),
    Activity(Activity),
    Expense(Expense),
    Reminder(Reminder),
}

macro_rules! resolved_conversions {
    ($($variant:ident),* $(,)?) => {
        $(
            impl TryFrom<ResolvedEntity> for $variant {
                type Error = ResolvedEntity;

                fn try_from(value: ResolvedEntity) -> Result<Self, Self::Error> {
                    match value {
                        ResolvedEntity::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

resolved_conversions!(User, Trip, Itinerary, Activity, Expense, Reminder);

impl ResolvedEntity {
    /// Kind of the resolved entity.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Trip(_) => EntityKind::Trip,
            Self::Itinerary(_) => EntityKind::Itinerary,
            Self::Activity(_) => EntityKind::Activity,
            Self::Expense(_) => EntityKind::Expense,
            Self::Reminder(_) => EntityKind::Reminder,
        }
    }
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T> {
    /// The principal owns the entity.
    Authorized(T),
    /// No entity with that id exists.
    NotFound,
    /// The entity exists but belongs to another user.
    Forbidden,
}

/// What the principal intends to do with the target; selects the message of
/// a forbidden verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    View,
    Update,
    Delete,
    /// Create a child of the given kind under the target.
    CreateChild(EntityKind),
    /// List the children of the given kind under the target.
    ListChildren(EntityKind),
}

/// Message returned when the principal is not the owner.
pub fn forbidden_message(kind: EntityKind, access: Access) -> String {
    let noun = kind.noun();
    match access {
        Access::View => format!("User not authorized to view this {noun}"),
        Access::Update => format!("User not authorized to update this {noun}"),
        Access::Delete => format!("User not authorized to delete this {noun}"),
        Access::CreateChild(child) => format!(
            "User not authorized to create {} {} for this {noun}",
            child.article(),
            child.noun()
        ),
        Access::ListChildren(child) => {
            format!("User not authorized to view these {}", child.plural())
        }
    }
}

/// Message returned when the target does not exist.
pub fn not_found_message(kind: EntityKind) -> String {
    format!("{} not found", kind.title())
}

/// Translate a repository failure into a domain error for `kind`.
///
/// Infrastructure failures are logged and surfaced as a generic internal
/// error.
pub(crate) fn map_persistence_error(kind: EntityKind, error: PersistenceError) -> Error {
    match error {
        PersistenceError::Connection { .. } | PersistenceError::Query { .. } => {
            error!(entity = kind.noun(), %error, "repository operation failed");
            Error::internal("Internal server error")
        }
        PersistenceError::Duplicate { .. } if kind == EntityKind::User => {
            Error::conflict("Email already exists")
        }
        PersistenceError::Duplicate { .. } => {
            Error::conflict(format!("{} already exists", kind.title()))
        }
        PersistenceError::StaleWrite => Error::concurrent_modification(format!(
            "{} was modified by another request",
            kind.title()
        )),
        PersistenceError::Missing => Error::not_found(not_found_message(kind)),
    }
}

/// Walks parent relations to decide whether a principal owns an entity.
#[derive(Clone)]
pub struct OwnershipResolver {
    repos: RepositoryPorts,
}

impl OwnershipResolver {
    /// Create a resolver over the persistence gateway.
    pub fn new(repos: RepositoryPorts) -> Self {
        Self { repos }
    }

    async fn lookup(
        &self,
        target: EntityRef,
    ) -> Result<Option<Owned<ResolvedEntity>>, PersistenceError> {
        let found = match target {
            EntityRef::User(id) => self.repos.users.find_by_id(&id).await?.map(|user| {
                let owner = user.id;
                Owned::new(ResolvedEntity::User(user), owner)
            }),
            EntityRef::Trip(id) => self.repos.trips.find_by_id(&id).await?.map(|trip| {
                let owner = trip.user_id;
                Owned::new(ResolvedEntity::Trip(trip), owner)
            }),
            EntityRef::Itinerary(id) => self
                .repos
                .itineraries
                .find_by_id(&id)
                .await?
                .map(|found| Owned::new(ResolvedEntity::Itinerary(found.record), found.owner)),
            EntityRef::Activity(id) => self
                .repos
                .activities
                .find_by_id(&id)
                .await?
                .map(|found| Owned::new(ResolvedEntity::Activity(found.record), found.owner)),
            EntityRef::Expense(id) => self
                .repos
                .expenses
                .find_by_id(&id)
                .await?
                .map(|found| Owned::new(ResolvedEntity::Expense(found.record), found.owner)),
            EntityRef::Reminder(id) => self.repos.reminders.find_by_id(&id).await?.map(|reminder| {
                let owner = reminder.user_id;
                Owned::new(ResolvedEntity::Reminder(reminder), owner)
            }),
        };
        Ok(found)
    }

    /// Resolve `target` and compare its root owner with `principal`.
    ///
    /// # Errors
    /// Only repository failures are errors; absence and foreign ownership are
    /// verdicts.
    pub async fn resolve(
        &self,
        principal: &UserId,
        target: EntityRef,
    ) -> Result<Verdict<ResolvedEntity>, PersistenceError> {
        let verdict = match self.lookup(target).await? {
            None => Verdict::NotFound,
            Some(found) if found.owner != *principal => Verdict::Forbidden,
            Some(found) => Verdict::Authorized(found.record),
        };
        Ok(verdict)
    }

    /// Resolve `target` and return the typed entity when the principal owns
    /// it.
    ///
    /// # Errors
    /// `NotFound` when absent, `Forbidden` when owned by someone else, and
    /// `InternalError` on repository failure.
    pub async fn authorize<T>(
        &self,
        principal: &UserId,
        target: EntityRef,
        access: Access,
    ) -> Result<T, Error>
    where
        T: TryFrom<ResolvedEntity, Error = ResolvedEntity>,
    {
        let kind = target.kind();
        let verdict = self
            .resolve(principal, target)
            .await
            .map_err(|err| map_persistence_error(kind, err))?;
        match verdict {
            Verdict::NotFound => Err(Error::not_found(not_found_message(kind))),
            Verdict::Forbidden => Err(Error::forbidden(forbidden_message(kind, access))),
            Verdict::Authorized(entity) => T::try_from(entity).map_err(|other| {
                error!(
                    expected = kind.noun(),
                    actual = other.kind().noun(),
                    "resolver returned mismatched entity"
                );
                Error::internal("Internal server error")
            }),
        }
    }
}

/// Check that every listed child belongs to the principal.
///
/// Scoped queries should never return foreign rows; if one does, the whole
/// listing is refused rather than filtered.
pub fn authorize_listing<T>(
    principal: &UserId,
    child: EntityKind,
    items: Vec<Owned<T>>,
) -> Result<Vec<T>, Error> {
    if items.iter().any(|item| item.owner != *principal) {
        return Err(Error::forbidden(format!(
            "User not authorized to view these {}",
            child.plural()
        )));
    }
    Ok(items.into_iter().map(|item| item.record).collect())
}

#[cfg(test)]
#[path = "ownership_tests.rs"]
mod tests;
