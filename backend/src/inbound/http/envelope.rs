//! Uniform JSON response envelope.
//!
//! Every response body, success or failure, has the shape
//! `{success, message, data?, errors?}`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, FieldError};
use crate::inbound::http::schemas::FieldErrorSchema;

/// Response envelope carrying an optional payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable outcome.
    #[schema(example = "Trip successfully created")]
    pub message: String,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-level validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<FieldErrorSchema>>)]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    /// Successful outcome with a payload.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// Successful outcome without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// Failure body for a domain error. The message is used verbatim, so
    /// callers redact internal errors first.
    pub fn failure(error: &Error) -> Self {
        let errors = error.field_errors();
        Self {
            success: false,
            message: error.message().to_owned(),
            data: None,
            errors: (!errors.is_empty()).then(|| errors.to_vec()),
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, body: &Envelope<T>) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// `200 OK` with a payload.
pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, &Envelope::success(message, data))
}

/// `201 Created` with the new record.
pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, &Envelope::success(message, data))
}

/// `200 OK` carrying only a message.
pub fn done(message: &str) -> HttpResponse {
    respond(StatusCode::OK, &Envelope::done(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn success_omits_errors() {
        let body = serde_json::to_value(Envelope::success("Trip successfully retrieved", 7))
            .expect("serialise envelope");
        assert_eq!(
            body,
            json!({"success": true, "message": "Trip successfully retrieved", "data": 7})
        );
    }

    #[rstest]
    fn failure_lists_field_errors() {
        let error = Error::invalid_field(
            "Invalid input",
            FieldError::new("title", "required", "title must not be empty"),
        );
        let body = serde_json::to_value(Envelope::failure(&error)).expect("serialise envelope");
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["errors"][0]["field"], "title");
        assert!(body.get("data").is_none());
    }

    #[rstest]
    fn failure_without_fields_has_no_errors_key() {
        let body = serde_json::to_value(Envelope::failure(&Error::not_found("Trip not found")))
            .expect("serialise envelope");
        assert!(body.get("errors").is_none());
        assert_eq!(body["message"], "Trip not found");
    }
}
