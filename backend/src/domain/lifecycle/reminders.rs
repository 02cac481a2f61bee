//! Reminder lifecycle.
//!
//! Reminders are owned directly by a user but also point at a trip. Creation
//! resolves the trip so a reminder can never reference a foreign trip, and
//! updates must name the stored trip.

use super::{LifecycleManager, persisted, require_same_parent};
use crate::domain::fields::FieldErrors;
use crate::domain::{
    Access, EntityKind, EntityRef, Error, Reminder, ReminderChanges, ReminderDraft, ReminderId,
    Trip, UserId,
};

impl LifecycleManager {
    /// Reminders owned by the principal, soonest first.
    pub async fn list_reminders(&self, principal: &UserId) -> Result<Vec<Reminder>, Error> {
        let reminders = persisted(
            EntityKind::Reminder,
            self.repos.reminders.list_by_user(principal).await,
        )?;
        if reminders.iter().any(|reminder| reminder.user_id != *principal) {
            return Err(Error::forbidden(
                "User not authorized to view these reminders",
            ));
        }
        Ok(reminders)
    }

    /// Fetch one of the principal's reminders.
    pub async fn get_reminder(
        &self,
        principal: &UserId,
        id: &ReminderId,
    ) -> Result<Reminder, Error> {
        self.authorize(principal, EntityRef::Reminder(*id), Access::View)
            .await
    }

    /// Create a reminder for one of the principal's trips.
    pub async fn create_reminder(
        &self,
        principal: &UserId,
        draft: ReminderDraft,
    ) -> Result<Reminder, Error> {
        let mut errors = FieldErrors::new();
        errors.require_text("message", &draft.message);
        errors.finish()?;

        let trip: Trip = self
            .authorize(
                principal,
                EntityRef::Trip(draft.trip_id),
                Access::CreateChild(EntityKind::Reminder),
            )
            .await?;
        require_claimed_owner(
            principal,
            draft.claimed_owner.as_ref(),
            "User not authorized to create a reminder for this user",
        )?;
        let now = self.now();
        let reminder = Reminder {
            id: ReminderId::random(),
            user_id: trip.user_id,
            trip_id: trip.id,
            message: draft.message,
            time: draft.time,
            created_at: now,
            updated_at: now,
        };
        persisted(
            EntityKind::Reminder,
            self.repos.reminders.insert(&reminder).await,
        )
    }

    /// Apply a partial update. `changes.trip_id` must equal the stored trip.
    pub async fn update_reminder(
        &self,
        principal: &UserId,
        id: &ReminderId,
        changes: ReminderChanges,
    ) -> Result<Reminder, Error> {
        let mut errors = FieldErrors::new();
        errors.require_patch_text("message", &changes.message);
        errors.finish()?;

        let stored: Reminder = self
            .authorize(principal, EntityRef::Reminder(*id), Access::Update)
            .await?;
        require_claimed_owner(
            principal,
            changes.claimed_owner.as_ref(),
            "User not authorized to update this reminder",
        )?;
        require_same_parent(EntityKind::Reminder, &changes.trip_id, &stored.trip_id)?;

        let expected = stored.updated_at;
        let merged = Reminder {
            message: changes.message.apply(stored.message),
            time: changes.time.apply(stored.time),
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::Reminder,
            self.repos.reminders.update(&merged, expected).await,
        )
    }

    /// Delete a reminder, conditional on the revision just read.
    pub async fn delete_reminder(&self, principal: &UserId, id: &ReminderId) -> Result<(), Error> {
        let stored: Reminder = self
            .authorize(principal, EntityRef::Reminder(*id), Access::Delete)
            .await?;
        persisted(
            EntityKind::Reminder,
            self.repos
                .reminders
                .delete(&stored.id, stored.updated_at)
                .await,
        )
    }
}

/// A client-supplied owner is only checked once the target has resolved, so
/// a missing record still reports not found.
fn require_claimed_owner(
    principal: &UserId,
    claimed: Option<&UserId>,
    message: &'static str,
) -> Result<(), Error> {
    match claimed {
        Some(user_id) if user_id != principal => Err(Error::forbidden(message)),
        _ => Ok(()),
    }
}
