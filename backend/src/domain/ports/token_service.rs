//! Port for issuing and verifying bearer tokens.

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token was well formed but its lifetime has passed.
        Expired => "token has expired",
        /// The token failed signature or structural checks.
        Invalid { message: String } => "token is invalid: {message}",
        /// A token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issue bearer tokens for authenticated principals and verify them on
/// later requests.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the principal's id and email.
    fn issue(&self, principal: &Principal) -> Result<String, TokenError>;

    /// Verify a token and recover its principal.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}
