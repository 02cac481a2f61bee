//! Trip lifecycle.

use super::{LifecycleManager, persisted};
use crate::domain::fields::FieldErrors;
use crate::domain::{
    Access, EntityKind, EntityRef, Error, TRIP_DATES, Trip, TripChanges, TripDraft, TripId,
    UserId,
};

impl LifecycleManager {
    /// Trips owned by the principal, earliest first.
    pub async fn list_trips(&self, principal: &UserId) -> Result<Vec<Trip>, Error> {
        let trips = persisted(
            EntityKind::Trip,
            self.repos.trips.list_by_user(principal).await,
        )?;
        if trips.iter().any(|trip| trip.user_id != *principal) {
            return Err(Error::forbidden("User not authorized to view these trips"));
        }
        Ok(trips)
    }

    /// Fetch one of the principal's trips.
    pub async fn get_trip(&self, principal: &UserId, id: &TripId) -> Result<Trip, Error> {
        self.authorize(principal, EntityRef::Trip(*id), Access::View)
            .await
    }

    /// Create a trip owned by the principal.
    pub async fn create_trip(&self, principal: &UserId, draft: TripDraft) -> Result<Trip, Error> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &draft.title);
        errors.require_text("destination", &draft.destination);
        errors.finish()?;
        TRIP_DATES.check(draft.start_date, draft.end_date)?;

        let owner = self.require_account(principal, EntityKind::Trip).await?;
        let now = self.now();
        let trip = Trip {
            id: TripId::random(),
            user_id: owner.id,
            title: draft.title,
            description: draft.description,
            destination: draft.destination,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
        };
        persisted(EntityKind::Trip, self.repos.trips.insert(&trip).await)
    }

    /// Apply a partial update to a trip.
    ///
    /// Moving one endpoint is checked against the stored other endpoint;
    /// replacing both only checks their order.
    pub async fn update_trip(
        &self,
        principal: &UserId,
        id: &TripId,
        changes: TripChanges,
    ) -> Result<Trip, Error> {
        let mut errors = FieldErrors::new();
        errors.require_patch_text("title", &changes.title);
        errors.require_patch_text("destination", &changes.destination);
        errors.finish()?;

        let stored: Trip = self
            .authorize(principal, EntityRef::Trip(*id), Access::Update)
            .await?;
        let (start_date, end_date) = TRIP_DATES.merge(
            (stored.start_date, stored.end_date),
            changes.start_date,
            changes.end_date,
        )?;

        let expected = stored.updated_at;
        let merged = Trip {
            title: changes.title.apply(stored.title),
            description: changes.description.apply(stored.description),
            destination: changes.destination.apply(stored.destination),
            start_date,
            end_date,
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::Trip,
            self.repos.trips.update(&merged, expected).await,
        )
    }

    /// Delete a trip with its itineraries, activities, expenses and
    /// reminders.
    pub async fn delete_trip(&self, principal: &UserId, id: &TripId) -> Result<(), Error> {
        let stored: Trip = self
            .authorize(principal, EntityRef::Trip(*id), Access::Delete)
            .await?;
        persisted(
            EntityKind::Trip,
            self.repos.trips.delete(&stored.id, stored.updated_at).await,
        )
    }
}
