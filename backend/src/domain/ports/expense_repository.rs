//! Port abstraction for persisting expenses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ActivityId, Expense, ExpenseId, Owned};

use super::PersistenceError;

/// Port for storing and retrieving expenses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Fetch an expense together with its root owner.
    async fn find_by_id(&self, id: &ExpenseId)
    -> Result<Option<Owned<Expense>>, PersistenceError>;

    /// Expenses of an activity, oldest first.
    async fn list_by_activity(
        &self,
        activity_id: &ActivityId,
    ) -> Result<Vec<Owned<Expense>>, PersistenceError>;

    /// Insert a new expense.
    async fn insert(&self, expense: &Expense) -> Result<Expense, PersistenceError>;

    /// Replace a stored expense if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        expense: &Expense,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Expense, PersistenceError>;

    /// Delete an expense.
    async fn delete(
        &self,
        id: &ExpenseId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
