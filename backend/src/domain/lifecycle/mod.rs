//! Entity lifecycle: create, read, partial update and delete.
//!
//! Every operation follows the same shape:
//!
//! 1. validate the inputs that need no stored state,
//! 2. resolve the target (or the parent, for creation) through the
//!    [`OwnershipResolver`] so absence and foreign ownership are decided in one
//!    place,
//! 3. merge and validate against the stored record,
//! 4. write conditionally on the `updated_at` observed in step 2.
//!
//! A write that loses a race surfaces as `ConcurrentModification`, and a
//! record deleted in between surfaces as `NotFound`.

mod activities;
mod expenses;
mod itineraries;
mod reminders;
mod trips;
mod users;

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use mockable::Clock;

use super::ownership::{forbidden_message, map_persistence_error};
use super::ports::{CredentialHasher, PersistenceError, RepositoryPorts};
use super::{
    Access, EntityKind, EntityRef, Error, OwnershipResolver, ResolvedEntity, User, UserId,
};

/// Orchestrates entity mutations under the ownership and range rules.
#[derive(Clone)]
pub struct LifecycleManager {
    repos: RepositoryPorts,
    resolver: OwnershipResolver,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl LifecycleManager {
    /// Build a manager over the persistence gateway.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use travel_backend::domain::LifecycleManager;
    /// # use travel_backend::outbound::memory::InMemoryStore;
    /// # use travel_backend::outbound::security::Argon2Hasher;
    /// let store = InMemoryStore::new();
    /// let manager = LifecycleManager::new(
    ///     store.repository_ports(),
    ///     Arc::new(Argon2Hasher::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = manager;
    /// ```
    pub fn new(
        repos: RepositoryPorts,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = OwnershipResolver::new(repos.clone());
        Self {
            repos,
            resolver,
            hasher,
            clock,
        }
    }

    /// Current instant at storage precision.
    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }

    /// Timestamp for a rewrite of a record last written at `previous`.
    ///
    /// Always strictly later than `previous`, so a conditional write can tell
    /// two successive revisions apart even when the clock has not advanced.
    fn next_revision(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.now();
        if now > previous {
            now
        } else {
            previous + Duration::microseconds(1)
        }
    }

    async fn authorize<T>(
        &self,
        principal: &UserId,
        target: EntityRef,
        access: Access,
    ) -> Result<T, Error>
    where
        T: TryFrom<ResolvedEntity, Error = ResolvedEntity>,
    {
        self.resolver.authorize(principal, target, access).await
    }

    /// Confirm the principal still exists before creating a top-level record.
    async fn require_account(&self, principal: &UserId, child: EntityKind) -> Result<User, Error> {
        self.authorize(principal, EntityRef::User(*principal), Access::CreateChild(child))
            .await
    }
}

/// Shorthand for mapping a repository result for `kind`.
fn persisted<T>(kind: EntityKind, result: Result<T, PersistenceError>) -> Result<T, Error> {
    result.map_err(|err| map_persistence_error(kind, err))
}

/// Reject a supplied parent id that differs from the stored one.
fn require_same_parent<Id: PartialEq>(
    kind: EntityKind,
    supplied: &Id,
    stored: &Id,
) -> Result<(), Error> {
    if supplied == stored {
        Ok(())
    } else {
        Err(Error::forbidden(forbidden_message(kind, Access::Update)))
    }
}
