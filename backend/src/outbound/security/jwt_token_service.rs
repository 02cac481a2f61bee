//! HS256 JSON Web Token implementation of the `TokenService` port.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{Principal, UserId};

/// Token payload. `iat` and `exp` are seconds since the Unix epoch.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
///
/// Expiry is judged against the injected clock rather than the system time.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            id: principal.user_id.to_string(),
            email: principal.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation()).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        let claims = data.claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        let user_id =
            UserId::new(&claims.id).map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(Principal {
            user_id,
            email: claims.email,
        })
    }
}
