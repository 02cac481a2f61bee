//! Account registration and login.
//!
//! Inbound adapters call [`AccountService`] with validated [`Registration`]
//! and [`LoginCredentials`] values; hashing and token signing stay behind
//! the [`CredentialHasher`] and [`TokenService`] ports.

use std::sync::Arc;

use chrono::SubsecRound;
use mockable::Clock;
use tracing::{error, info};

use super::ownership::map_persistence_error;
use super::ports::{CredentialHasher, TokenService, UserRepository};
use super::{EntityKind, Error, LoginCredentials, Principal, Registration, User, UserId};

/// A successful login: the signed bearer token and the account it belongs
/// to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Registers accounts and exchanges credentials for bearer tokens.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

fn internal(context: &'static str, err: impl std::fmt::Display) -> Error {
    error!(error = %err, "{context}");
    Error::internal("Internal server error")
}

impl AccountService {
    /// Assemble the service from its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    /// Create an account.
    ///
    /// # Errors
    /// `Conflict` with "Email already exists" when the address is taken,
    /// including when a concurrent registration wins the unique index.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(|err| map_persistence_error(EntityKind::User, err))?;
        if existing.is_some() {
            return Err(Error::conflict("Email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(|err| internal("password hashing failed", err))?;
        let now = self.clock.utc().trunc_subsecs(6);
        let user = User {
            id: UserId::random(),
            name: registration.name().to_owned(),
            email: registration.email().clone(),
            password_hash,
            phone_number: None,
            profile_picture_url: None,
            created_at: now,
            updated_at: now,
        };
        let stored = self
            .users
            .insert(&user)
            .await
            .map_err(|err| map_persistence_error(EntityKind::User, err))?;
        info!(user_id = %stored.id, "account registered");
        Ok(stored)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// `NotFound` "User not found" for an unknown address and
    /// `Unauthenticated` "Invalid password" for a wrong password.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_persistence_error(EntityKind::User, err))?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(|err| internal("password verification failed", err))?;
        if !verified {
            return Err(Error::unauthenticated("Invalid password"));
        }

        let principal = Principal {
            user_id: user.id,
            email: user.email.as_str().to_owned(),
        };
        let token = self
            .tokens
            .issue(&principal)
            .map_err(|err| internal("token signing failed", err))?;
        Ok(Session { token, user })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockCredentialHasher, MockTokenService, MockUserRepository, PersistenceError,
    };
    use crate::domain::{Email, ErrorCode, PasswordHash};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 12, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn stored_user() -> User {
        User {
            id: UserId::random(),
            name: "Ana".to_owned(),
            email: Email::new("ana@example.com").expect("email"),
            password_hash: PasswordHash::new("$argon2id$stub"),
            phone_number: None,
            profile_picture_url: None,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    fn service(
        users: MockUserRepository,
        hasher: MockCredentialHasher,
        tokens: MockTokenService,
    ) -> AccountService {
        AccountService::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(tokens),
            Arc::new(FixtureClock(fixed_now())),
        )
    }

    fn registration() -> Registration {
        Registration::try_from_parts("Ana", "ana@example.com", "secret", "secret")
            .expect("valid registration")
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_and_stores_the_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| user.password_hash.as_str() == "hashed" && user.name == "Ana")
            .return_once(|user| Ok(user.clone()));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password == "secret")
            .return_once(|_| Ok(PasswordHash::new("hashed")));

        let user = service(users, hasher, MockTokenService::new())
            .register(registration())
            .await
            .expect("registration succeeds");
        assert_eq!(user.email.as_str(), "ana@example.com");
        assert_eq!(user.created_at, fixed_now());
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_a_taken_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(|_| Ok(Some(stored_user())));
        users.expect_insert().never();

        let err = service(users, MockCredentialHasher::new(), MockTokenService::new())
            .register(registration())
            .await
            .expect_err("duplicate email");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Email already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_a_lost_unique_race_to_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_insert()
            .return_once(|_| Err(PersistenceError::duplicate("users_email_key")));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("hashed")));

        let err = service(users, hasher, MockTokenService::new())
            .register(registration())
            .await
            .expect_err("duplicate email");
        assert_eq!(err.message(), "Email already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn login_rejects_a_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(|_| Ok(Some(stored_user())));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(false));
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().never();

        let creds = LoginCredentials::try_from_parts("ana@example.com", "wrong").expect("creds");
        let err = service(users, hasher, tokens)
            .login(&creds)
            .await
            .expect_err("wrong password");
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
        assert_eq!(err.message(), "Invalid password");
    }

    #[rstest]
    #[tokio::test]
    async fn login_reports_unknown_users() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));

        let creds = LoginCredentials::try_from_parts("who@example.com", "pw").expect("creds");
        let err = service(users, MockCredentialHasher::new(), MockTokenService::new())
            .login(&creds)
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_a_token_for_the_principal() {
        let user = stored_user();
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(user)));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(true));
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .withf(move |principal| principal.user_id == user_id)
            .return_once(|_| Ok("signed.token".to_owned()));

        let creds = LoginCredentials::try_from_parts("ana@example.com", "secret").expect("creds");
        let session = service(users, hasher, tokens)
            .login(&creds)
            .await
            .expect("login succeeds");
        assert_eq!(session.token, "signed.token");
        assert_eq!(session.user.id, user_id);
    }
}
