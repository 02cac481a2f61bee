//! Small helpers for collecting field-level validation failures.

use super::{Error, FieldError, Patch};

/// Accumulates field failures so a request reports every problem at once.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Record a failure when `value` is blank.
    pub(crate) fn require_text(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(FieldError::new(
                field,
                "required",
                format!("{field} must not be empty"),
            ));
        }
    }

    /// Record a failure when a supplied replacement value is blank.
    pub(crate) fn require_patch_text(&mut self, field: &'static str, value: &Patch<String>) {
        if let Some(text) = value.as_present() {
            self.require_text(field, text);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise an "Invalid input" error.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::validation("Invalid input", self.0))
        }
    }
}
