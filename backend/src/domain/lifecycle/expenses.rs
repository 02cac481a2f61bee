//! Expense lifecycle.

use super::{LifecycleManager, persisted, require_same_parent};
use crate::domain::fields::FieldErrors;
use crate::domain::{
    Access, Activity, ActivityId, EntityKind, EntityRef, Error, Expense, ExpenseChanges,
    ExpenseDraft, ExpenseId, UserId, authorize_listing,
};

impl LifecycleManager {
    /// Expenses recorded against an activity, once the activity resolves
    /// to the principal.
    pub async fn list_expenses(
        &self,
        principal: &UserId,
        activity_id: &ActivityId,
    ) -> Result<Vec<Expense>, Error> {
        let _: Activity = self
            .authorize(
                principal,
                EntityRef::Activity(*activity_id),
                Access::ListChildren(EntityKind::Expense),
            )
            .await?;
        let listed = persisted(
            EntityKind::Expense,
            self.repos.expenses.list_by_activity(activity_id).await,
        )?;
        authorize_listing(principal, EntityKind::Expense, listed)
    }

    pub async fn get_expense(&self, principal: &UserId, id: &ExpenseId) -> Result<Expense, Error> {
        self.authorize(principal, EntityRef::Expense(*id), Access::View)
            .await
    }

    /// Record an expense against one of the principal's activities.
    pub async fn create_expense(
        &self,
        principal: &UserId,
        draft: ExpenseDraft,
    ) -> Result<Expense, Error> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &draft.title);
        errors.require_text("currency", &draft.currency);
        errors.finish()?;

        let activity: Activity = self
            .authorize(
                principal,
                EntityRef::Activity(draft.activity_id),
                Access::CreateChild(EntityKind::Expense),
            )
            .await?;
        let now = self.now();
        let expense = Expense {
            id: ExpenseId::random(),
            activity_id: activity.id,
            title: draft.title,
            description: draft.description,
            amount: draft.amount,
            currency: draft.currency,
            created_at: now,
            updated_at: now,
        };
        persisted(
            EntityKind::Expense,
            self.repos.expenses.insert(&expense).await,
        )
    }

    /// Apply a partial update. A supplied activity id must name the stored
    /// parent.
    pub async fn update_expense(
        &self,
        principal: &UserId,
        id: &ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<Expense, Error> {
        let mut errors = FieldErrors::new();
        errors.require_patch_text("title", &changes.title);
        errors.require_patch_text("currency", &changes.currency);
        errors.finish()?;

        let stored: Expense = self
            .authorize(principal, EntityRef::Expense(*id), Access::Update)
            .await?;
        if let Some(activity_id) = changes.activity_id.as_present() {
            require_same_parent(EntityKind::Expense, activity_id, &stored.activity_id)?;
        }

        let expected = stored.updated_at;
        let merged = Expense {
            title: changes.title.apply(stored.title),
            description: changes.description.apply(stored.description),
            amount: changes.amount.apply(stored.amount),
            currency: changes.currency.apply(stored.currency),
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::Expense,
            self.repos.expenses.update(&merged, expected).await,
        )
    }

    /// Delete an expense, conditional on the revision just read.
    pub async fn delete_expense(&self, principal: &UserId, id: &ExpenseId) -> Result<(), Error> {
        let stored: Expense = self
            .authorize(principal, EntityRef::Expense(*id), Access::Delete)
            .await?;
        persisted(
            EntityKind::Expense,
            self.repos
                .expenses
                .delete(&stored.id, stored.updated_at)
                .await,
        )
    }
}
