//! Port abstraction for persisting users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, User, UserId};

use super::PersistenceError;

/// Port for storing and retrieving users.
///
/// `update` and `delete` are conditional on `expected_updated_at`, the
/// timestamp observed when the caller authorised the change. A mismatch
/// yields [`PersistenceError::StaleWrite`]; a vanished row yields
/// [`PersistenceError::Missing`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch a user by their unique email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError>;

    /// Insert a new user. Fails with [`PersistenceError::Duplicate`] when the
    /// email is taken.
    async fn insert(&self, user: &User) -> Result<User, PersistenceError>;

    /// Replace a stored user if it is unchanged since `expected_updated_at`.
    async fn update(
        &self,
        user: &User,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<User, PersistenceError>;

    /// Delete a user and everything it owns.
    async fn delete(
        &self,
        id: &UserId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
