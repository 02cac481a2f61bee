//! Builders for the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use travel_backend::domain::ports::RepositoryPorts;
use travel_backend::inbound::http::state::HttpState;
use travel_backend::outbound::memory::InMemoryStore;
use travel_backend::outbound::persistence::{DbPool, diesel_repository_ports};
use travel_backend::outbound::security::{Argon2Hasher, JwtTokenService};

use super::ServerConfig;

/// PostgreSQL repositories when a pool is configured, otherwise a fresh
/// in-memory store.
fn build_repository_ports(db_pool: Option<&DbPool>) -> RepositoryPorts {
    match db_pool {
        Some(pool) => {
            info!(store = "postgres", "repositories configured");
            diesel_repository_ports(pool)
        }
        None => {
            warn!(
                store = "memory",
                "no database configured; data will not survive a restart"
            );
            InMemoryStore::new().repository_ports()
        }
    }
}

/// Repositories the server will use: prebuilt ones when supplied, else
/// those chosen by [`build_repository_ports`].
pub(crate) fn repository_ports(config: &ServerConfig) -> RepositoryPorts {
    #[cfg(feature = "example-data")]
    if let Some(repositories) = &config.repositories {
        return repositories.clone();
    }
    build_repository_ports(config.db_pool.as_ref())
}

/// Build the shared HTTP state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = Arc::new(JwtTokenService::new(
        &config.signing_secret,
        config.token_ttl,
        clock.clone(),
    ));
    web::Data::new(HttpState::new(
        repository_ports(config),
        Arc::new(Argon2Hasher::default()),
        tokens,
        clock,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;
    use travel_backend::domain::ports::TokenService;
    use travel_backend::domain::{LoginCredentials, Registration};
    use zeroize::Zeroizing;

    #[rstest]
    #[tokio::test]
    async fn without_a_pool_accounts_live_in_memory() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("valid address"),
            Zeroizing::new(b"state-builder-secret".to_vec()),
            Duration::minutes(5),
        );
        let state = build_http_state(&config);

        let registration =
            Registration::try_from_parts("Ana", "ana@example.com", "pw-123", "pw-123")
                .expect("valid registration");
        let user = state
            .accounts
            .register(registration)
            .await
            .expect("registered");

        let credentials = LoginCredentials::try_from_parts("ana@example.com", "pw-123")
            .expect("valid credentials");
        let session = state.accounts.login(&credentials).await.expect("logged in");
        let principal = state.tokens.verify(&session.token).expect("token verifies");
        assert_eq!(principal.user_id, user.id);
    }

    #[cfg(feature = "example-data")]
    #[rstest]
    #[tokio::test]
    async fn supplied_repositories_back_the_http_state() {
        let repositories = InMemoryStore::new().repository_ports();
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("valid address"),
            Zeroizing::new(b"state-builder-secret".to_vec()),
            Duration::minutes(5),
        )
        .with_repositories(repositories.clone());

        let registration =
            Registration::try_from_parts("Ana", "ana@example.com", "pw-123", "pw-123")
                .expect("valid registration");
        build_http_state(&config)
            .accounts
            .register(registration)
            .await
            .expect("registered");

        let email = travel_backend::domain::Email::new("ana@example.com").expect("valid email");
        let stored = repositories
            .users
            .find_by_email(&email)
            .await
            .expect("query");
        assert!(stored.is_some(), "account written to the supplied store");
    }
}
