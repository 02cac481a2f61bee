//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses with a status code chosen from the [`ErrorCode`].

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing or malformed input, or a violated range rule.
    ValidationFailed,
    /// The bearer credential is missing, invalid or expired, or a password
    /// check failed.
    Unauthenticated,
    /// Authenticated, but the resource belongs to someone else.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// A unique value (such as an email address) is already taken.
    Conflict,
    /// The record changed between the authorising read and the write.
    ConcurrentModification,
    /// An unexpected failure in persistence or a credential provider.
    InternalError,
}

/// Field-scoped validation failure reported alongside a
/// [`ErrorCode::ValidationFailed`] error.
///
/// # Examples
/// ```
/// use travel_backend::domain::FieldError;
///
/// let error = FieldError::new("title", "required", "title is required");
/// assert_eq!(error.field(), "title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    code: String,
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Machine-readable reason, e.g. `required` or `invalid_uuid`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never empty; blank messages are replaced by a generic one
///   for the code.
///
/// # Examples
/// ```
/// use travel_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Trip not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    field_errors: Vec<FieldError>,
}

fn fallback_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::ValidationFailed => "Invalid input",
        ErrorCode::Unauthenticated => "Unauthenticated",
        ErrorCode::Forbidden => "Forbidden",
        ErrorCode::NotFound => "Not found",
        ErrorCode::Conflict => "Conflict",
        ErrorCode::ConcurrentModification => "Resource was modified concurrently",
        _ => "Internal server error",
    }
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            fallback_message(code).to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            field_errors: Vec::new(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level validation failures, if any.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Attach field-level failures to the error.
    pub fn with_field_errors(mut self, errors: impl IntoIterator<Item = FieldError>) -> Self {
        self.field_errors.extend(errors);
        self
    }

    /// Validation failure with a single offending field.
    pub fn invalid_field(message: impl Into<String>, error: FieldError) -> Self {
        Self::validation(message, vec![error])
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_field_errors(errors)
    }

    /// Convenience constructor for [`ErrorCode::Unauthenticated`].
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ConcurrentModification`].
    pub fn concurrent_modification(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrentModification, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
