//! Authentication primitives: principals, login credentials and
//! registrations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use zeroize::Zeroizing;

use super::{Email, Error, FieldError, UserId};

/// The authenticated identity attached to a request after token
/// verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

fn blank_fields<'a>(fields: &[(&'static str, &'a str)]) -> Vec<FieldError> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError::new(*field, "required", format!("{field} is required")))
        .collect()
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a well-formed address.
/// - `password` is non-empty and retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use travel_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ana@example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_str(), "ana@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, Error> {
        let missing = blank_fields(&[("email", email), ("password", password)]);
        if !missing.is_empty() {
            return Err(Error::validation("All fields are required", missing));
        }
        let email = Email::new(email.trim())
            .map_err(|err| Error::invalid_field("Invalid input", err.to_field_error()))?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Address used for the user lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate registration inputs.
    ///
    /// All four values are required, the passwords must match, and the email
    /// must be well formed.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, Error> {
        let missing = blank_fields(&[
            ("name", name),
            ("email", email),
            ("password", password),
            ("confirmPassword", confirm_password),
        ]);
        if !missing.is_empty() {
            return Err(Error::validation("All fields are required", missing));
        }
        if password != confirm_password {
            return Err(Error::invalid_field(
                "Passwords do not match",
                FieldError::new(
                    "confirmPassword",
                    "mismatch",
                    "confirmPassword must equal password",
                ),
            ));
        }
        let email = Email::new(email.trim())
            .map_err(|err| Error::invalid_field("Invalid input", err.to_field_error()))?;
        Ok(Self {
            name: name.trim().to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name of the new user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Login address of the new user.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
