//! User data model.
//!
//! A user is the root of every ownership chain. The stored password hash never
//! leaves the domain: adapters render users through response types that omit
//! it.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::{FieldError, Patch, UserId};

/// Validation errors for user attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The email address was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address was not of the form `local@domain.tld`.
    #[error("email must be a valid email address")]
    InvalidEmail,
}

impl UserValidationError {
    /// Render as a field error for the `email` field.
    pub fn to_field_error(&self) -> FieldError {
        let code = match self {
            Self::EmptyEmail => "required",
            Self::InvalidEmail => "invalid_email",
        };
        FieldError::new("email", code, self.to_string())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique login address of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// # Examples
    /// ```
    /// use travel_backend::domain::Email;
    ///
    /// assert!(Email::new("ana@example.com").is_ok());
    /// assert!(Email::new("ana").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque password hash produced by a
/// [`CredentialHasher`](crate::domain::ports::CredentialHasher).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Patch<String>,
    pub email: Patch<Email>,
    pub phone_number: Patch<Option<String>>,
    pub profile_picture_url: Patch<Option<String>>,
}
