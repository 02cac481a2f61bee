//! Activity lifecycle.

use super::{LifecycleManager, persisted, require_same_parent};
use crate::domain::fields::FieldErrors;
use crate::domain::{
    ACTIVITY_TIMES, Access, Activity, ActivityChanges, ActivityDraft, ActivityId, EntityKind,
    EntityRef, Error, Itinerary, ItineraryId, UserId, authorize_listing,
};

impl LifecycleManager {
    /// Activities of an itinerary owned by the principal, ordered by start
    /// time.
    pub async fn list_activities(
        &self,
        principal: &UserId,
        itinerary_id: &ItineraryId,
    ) -> Result<Vec<Activity>, Error> {
        let _: Itinerary = self
            .authorize(
                principal,
                EntityRef::Itinerary(*itinerary_id),
                Access::ListChildren(EntityKind::Activity),
            )
            .await?;
        let listed = persisted(
            EntityKind::Activity,
            self.repos.activities.list_by_itinerary(itinerary_id).await,
        )?;
        authorize_listing(principal, EntityKind::Activity, listed)
    }

    /// Fetch an activity whose trip belongs to the principal.
    pub async fn get_activity(
        &self,
        principal: &UserId,
        id: &ActivityId,
    ) -> Result<Activity, Error> {
        self.authorize(principal, EntityRef::Activity(*id), Access::View)
            .await
    }

    /// Create an activity under an itinerary owned by the principal.
    pub async fn create_activity(
        &self,
        principal: &UserId,
        draft: ActivityDraft,
    ) -> Result<Activity, Error> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &draft.title);
        errors.require_text("location", &draft.location);
        errors.finish()?;
        ACTIVITY_TIMES.check(draft.start_time, draft.end_time)?;

        let itinerary: Itinerary = self
            .authorize(
                principal,
                EntityRef::Itinerary(draft.itinerary_id),
                Access::CreateChild(EntityKind::Activity),
            )
            .await?;
        let now = self.now();
        let activity = Activity {
            id: ActivityId::random(),
            itinerary_id: itinerary.id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            detail: draft.detail,
            created_at: now,
            updated_at: now,
        };
        persisted(
            EntityKind::Activity,
            self.repos.activities.insert(&activity).await,
        )
    }

    /// Apply a partial update to an activity.
    pub async fn update_activity(
        &self,
        principal: &UserId,
        id: &ActivityId,
        changes: ActivityChanges,
    ) -> Result<Activity, Error> {
        let mut errors = FieldErrors::new();
        errors.require_patch_text("title", &changes.title);
        errors.require_patch_text("location", &changes.location);
        errors.finish()?;

        let stored: Activity = self
            .authorize(principal, EntityRef::Activity(*id), Access::Update)
            .await?;
        if let Some(itinerary_id) = changes.itinerary_id.as_present() {
            require_same_parent(EntityKind::Activity, itinerary_id, &stored.itinerary_id)?;
        }
        let (start_time, end_time) = ACTIVITY_TIMES.merge(
            (stored.start_time, stored.end_time),
            changes.start_time,
            changes.end_time,
        )?;

        let expected = stored.updated_at;
        let merged = Activity {
            title: changes.title.apply(stored.title),
            description: changes.description.apply(stored.description),
            location: changes.location.apply(stored.location),
            start_time,
            end_time,
            category: changes.category.apply(stored.category),
            detail: changes.detail.apply(stored.detail),
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::Activity,
            self.repos.activities.update(&merged, expected).await,
        )
    }

    /// Delete an activity with its expenses.
    pub async fn delete_activity(&self, principal: &UserId, id: &ActivityId) -> Result<(), Error> {
        let stored: Activity = self
            .authorize(principal, EntityRef::Activity(*id), Access::Delete)
            .await?;
        persisted(
            EntityKind::Activity,
            self.repos
                .activities
                .delete(&stored.id, stored.updated_at)
                .await,
        )
    }
}
