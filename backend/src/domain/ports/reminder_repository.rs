//! Port abstraction for persisting reminders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Reminder, ReminderId, UserId};

use super::PersistenceError;

/// Port for storing and retrieving reminders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Fetch a reminder by id.
    async fn find_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, PersistenceError>;

    /// Reminders of a user, soonest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Reminder>, PersistenceError>;

    /// Insert a new reminder.
    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, PersistenceError>;

    /// Replace a stored reminder if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        reminder: &Reminder,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Reminder, PersistenceError>;

    /// Delete a reminder.
    async fn delete(
        &self,
        id: &ReminderId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
