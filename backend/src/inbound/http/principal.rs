//! Bearer-token extractor.
//!
//! Handlers take an [`AuthenticatedUser`] argument to require a valid
//! `Authorization: Bearer <token>` header. Verification is delegated to the
//! [`TokenService`](crate::domain::ports::TokenService) held in
//! [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::ports::TokenError;
use crate::domain::{Error, Principal, UserId};
use crate::inbound::http::state::HttpState;

const NO_AUTHORIZATION: &str = "There is no authorization present.";
const NO_TOKEN: &str = "There is no token provided.";
const INVALID_TOKEN: &str = "Token is invalid.";
const EXPIRED_TOKEN: &str = "Token has expired.";

/// The verified principal of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Principal);

impl AuthenticatedUser {
    /// Identifier of the authenticated user.
    pub fn id(&self) -> &UserId {
        &self.0.user_id
    }

    /// The full principal.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("HttpState missing from application data");
        Error::internal("HTTP state not configured")
    })?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthenticated(NO_AUTHORIZATION))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthenticated(INVALID_TOKEN))?;
    let token = value
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::unauthenticated(NO_TOKEN))?;

    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(|err| match err {
            TokenError::Expired => Error::unauthenticated(EXPIRED_TOKEN),
            other => {
                debug!(error = %other, "bearer token rejected");
                Error::unauthenticated(INVALID_TOKEN)
            }
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
