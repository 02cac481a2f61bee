//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use argon2::Params;
use chrono::Duration;
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::{Principal, Registration, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2Hasher, JwtTokenService};

pub(crate) const PASSWORD: &str = "hunter22";

/// Application wired to an empty in-memory store with cheap hashing.
pub(crate) struct TestApp {
    pub(crate) state: web::Data<HttpState>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let params = Params::new(1024, 1, 1, None).expect("cheap argon2 params");
        let tokens = Arc::new(JwtTokenService::new(
            b"handler-test-secret",
            Duration::hours(1),
            clock.clone(),
        ));
        let state = HttpState::new(
            InMemoryStore::new().repository_ports(),
            Arc::new(Argon2Hasher::with_params(params)),
            tokens,
            clock,
        );
        Self {
            state: web::Data::new(state),
        }
    }

    pub(crate) fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .configure(configure)
    }

    /// Register an account with [`PASSWORD`] and return its id.
    pub(crate) async fn register(&self, email: &str) -> UserId {
        let registration = Registration::try_from_parts("Ana", email, PASSWORD, PASSWORD)
            .expect("valid registration");
        self.state
            .accounts
            .register(registration)
            .await
            .expect("registration succeeds")
            .id
    }

    /// Register an account and return its id with a bearer header value.
    pub(crate) async fn sign_up(&self, email: &str) -> (UserId, String) {
        let id = self.register(email).await;
        let token = self
            .state
            .tokens
            .issue(&Principal {
                user_id: id,
                email: email.to_owned(),
            })
            .expect("token issued");
        (id, format!("Bearer {token}"))
    }
}
