//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialError, CredentialHasher};

fn hashing_error(error: impl ToString) -> CredentialError {
    CredentialError::hashing(error.to_string())
}

/// Hashes passwords into PHC strings using Argon2id.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }
}

impl Argon2Hasher {
    /// Use explicit cost parameters.
    ///
    /// Verification always honours the parameters encoded in the stored
    /// hash, so changing them only affects newly hashed passwords.
    ///
    /// # Examples
    /// ```
    /// use argon2::Params;
    /// use travel_backend::outbound::security::Argon2Hasher;
    ///
    /// let params = Params::new(1024, 1, 1, None).expect("valid parameters");
    /// let _hasher = Argon2Hasher::with_params(params);
    /// ```
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(engine: &Argon2<'_>, password: &[u8]) -> Result<PasswordHash, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let encoded = engine
        .hash_password(password, &salt)
        .map_err(hashing_error)?
        .to_string();
    Ok(PasswordHash::new(encoded))
}

fn verify_blocking(
    engine: &Argon2<'_>,
    password: &[u8],
    encoded: &str,
) -> Result<bool, CredentialError> {
    let parsed = password_hash::PasswordHash::new(encoded).map_err(hashing_error)?;
    match engine.verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(other) => Err(hashing_error(other)),
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let engine = self.engine();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&engine, password.as_bytes()))
            .await
            .map_err(hashing_error)?
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        let engine = self.engine();
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&engine, password.as_bytes(), &encoded))
            .await
            .map_err(hashing_error)?
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(1024, 1, 1, None).expect("cheap params"))
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted_phc_strings(hasher: Argon2Hasher) {
        let first = hasher.hash("hunter22").await.expect("hash");
        let second = hasher.hash("hunter22").await.expect("hash");

        assert!(first.as_str().starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn each_hash_carries_a_fresh_full_length_salt(hasher: Argon2Hasher) {
        let first = hasher.hash("hunter22").await.expect("hash");
        let second = hasher.hash("hunter22").await.expect("hash");
        let salt_of = |hash: &PasswordHash| {
            let parsed = password_hash::PasswordHash::new(hash.as_str()).expect("phc string");
            parsed.salt.expect("salt").as_str().to_owned()
        };

        let (first_salt, second_salt) = (salt_of(&first), salt_of(&second));
        assert_eq!(first_salt.len(), SaltString::generate(&mut OsRng).as_str().len());
        assert_ne!(first_salt, second_salt);
    }

    #[rstest]
    #[case("hunter22", true)]
    #[case("hunter23", false)]
    #[tokio::test]
    async fn verify_checks_the_password(
        hasher: Argon2Hasher,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let stored = hasher.hash("hunter22").await.expect("hash");
        let verdict = hasher.verify(attempt, &stored).await.expect("verify");
        assert_eq!(verdict, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_are_errors(hasher: Argon2Hasher) {
        let err = hasher
            .verify("hunter22", &PasswordHash::new("not-a-phc-string"))
            .await
            .expect_err("malformed hash");
        assert!(matches!(err, CredentialError::Hashing { .. }));
    }
}
