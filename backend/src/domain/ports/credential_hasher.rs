//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialError {
        /// Hashing failed, or a stored hash could not be parsed.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

/// Hash and verify passwords without exposing the algorithm.
///
/// `verify` returns `Ok(false)` for a wrong password; errors are reserved for
/// malformed hashes or provider failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}
