//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports, and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{CredentialHasher, RepositoryPorts, TokenService};
use crate::domain::{AccountService, LifecycleManager};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub lifecycle: Arc<LifecycleManager>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Assemble both domain services over one persistence gateway.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use chrono::Duration;
    /// use mockable::DefaultClock;
    /// use travel_backend::inbound::http::state::HttpState;
    /// use travel_backend::outbound::memory::InMemoryStore;
    /// use travel_backend::outbound::security::{Argon2Hasher, JwtTokenService};
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = Arc::new(JwtTokenService::new(b"secret", Duration::hours(1), clock.clone()));
    /// let state = HttpState::new(
    ///     InMemoryStore::new().repository_ports(),
    ///     Arc::new(Argon2Hasher::default()),
    ///     tokens,
    ///     clock,
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(
        repos: RepositoryPorts,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let accounts = AccountService::new(
            repos.users.clone(),
            hasher.clone(),
            tokens.clone(),
            clock.clone(),
        );
        let lifecycle = LifecycleManager::new(repos, hasher, clock);
        Self {
            lifecycle: Arc::new(lifecycle),
            accounts: Arc::new(accounts),
            tokens,
        }
    }
}
