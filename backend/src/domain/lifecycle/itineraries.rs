//! Itinerary lifecycle.

use super::{LifecycleManager, persisted, require_same_parent};
use crate::domain::{
    Access, EntityKind, EntityRef, Error, Itinerary, ItineraryChanges, ItineraryDraft,
    ItineraryId, Trip, TripId, UserId, authorize_listing,
};

impl LifecycleManager {
    /// Itineraries of a trip owned by the principal.
    pub async fn list_itineraries(
        &self,
        principal: &UserId,
        trip_id: &TripId,
    ) -> Result<Vec<Itinerary>, Error> {
        let _: Trip = self
            .authorize(
                principal,
                EntityRef::Trip(*trip_id),
                Access::ListChildren(EntityKind::Itinerary),
            )
            .await?;
        let listed = persisted(
            EntityKind::Itinerary,
            self.repos.itineraries.list_by_trip(trip_id).await,
        )?;
        authorize_listing(principal, EntityKind::Itinerary, listed)
    }

    /// Fetch an itinerary whose trip belongs to the principal.
    pub async fn get_itinerary(
        &self,
        principal: &UserId,
        id: &ItineraryId,
    ) -> Result<Itinerary, Error> {
        self.authorize(principal, EntityRef::Itinerary(*id), Access::View)
            .await
    }

    /// Create an itinerary under a trip owned by the principal.
    pub async fn create_itinerary(
        &self,
        principal: &UserId,
        draft: ItineraryDraft,
    ) -> Result<Itinerary, Error> {
        let trip: Trip = self
            .authorize(
                principal,
                EntityRef::Trip(draft.trip_id),
                Access::CreateChild(EntityKind::Itinerary),
            )
            .await?;
        let now = self.now();
        let itinerary = Itinerary {
            id: ItineraryId::random(),
            trip_id: trip.id,
            date: draft.date,
            created_at: now,
            updated_at: now,
        };
        persisted(
            EntityKind::Itinerary,
            self.repos.itineraries.insert(&itinerary).await,
        )
    }

    /// Replace the date of an itinerary. The supplied trip must be the
    /// stored parent.
    pub async fn update_itinerary(
        &self,
        principal: &UserId,
        id: &ItineraryId,
        changes: ItineraryChanges,
    ) -> Result<Itinerary, Error> {
        let stored: Itinerary = self
            .authorize(principal, EntityRef::Itinerary(*id), Access::Update)
            .await?;
        require_same_parent(EntityKind::Itinerary, &changes.trip_id, &stored.trip_id)?;

        let expected = stored.updated_at;
        let merged = Itinerary {
            date: changes.date,
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::Itinerary,
            self.repos.itineraries.update(&merged, expected).await,
        )
    }

    /// Delete an itinerary with its activities and expenses.
    pub async fn delete_itinerary(
        &self,
        principal: &UserId,
        id: &ItineraryId,
    ) -> Result<(), Error> {
        let stored: Itinerary = self
            .authorize(principal, EntityRef::Itinerary(*id), Access::Delete)
            .await?;
        persisted(
            EntityKind::Itinerary,
            self.repos
                .itineraries
                .delete(&stored.id, stored.updated_at)
                .await,
        )
    }
}
