//! Shared request parsing helpers for inbound HTTP adapters.
//!
//! Handlers parse every field of a body before returning, so a client sees
//! all problems in one response. Each parser records a [`FieldError`] exactly
//! when it returns `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ActivityCategory, Error, FieldError, Patch};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    Required,
    InvalidUuid,
    InvalidTimestamp,
    InvalidAmount,
    InvalidCategory,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidCategory => "invalid_category",
        }
    }

    fn describe(self, field: &str) -> String {
        match self {
            Self::Required => format!("{field} is required"),
            Self::InvalidUuid => format!("{field} must be a valid UUID"),
            Self::InvalidTimestamp => {
                format!("{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp")
            }
            Self::InvalidAmount => format!("{field} must be a whole number"),
            Self::InvalidCategory => format!(
                "{field} must be one of {}",
                ActivityCategory::ALL.map(ActivityCategory::as_str).join(", ")
            ),
        }
    }
}

/// An amount given either as a JSON integer or as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    Integer(i64),
    Text(String),
}

fn parse_uuid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Accept RFC 3339 timestamps and plain dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_amount(raw: AmountInput) -> Option<i64> {
    match raw {
        AmountInput::Integer(value) => Some(value),
        AmountInput::Text(text) => text.trim().parse().ok(),
    }
}

fn parse_category(raw: &str) -> Option<ActivityCategory> {
    raw.parse().ok()
}

/// Collects field failures while parsing a request.
#[derive(Debug, Default)]
pub(crate) struct RequestFields(Vec<FieldError>);

impl RequestFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &'static str, code: ErrorCode) {
        self.0
            .push(FieldError::new(field, code.as_str(), code.describe(field)));
    }

    fn required<R, T>(
        &mut self,
        field: &'static str,
        raw: Option<R>,
        code: ErrorCode,
        parse: impl FnOnce(R) -> Option<T>,
    ) -> Option<T> {
        let Some(raw) = raw else {
            self.reject(field, ErrorCode::Required);
            return None;
        };
        let parsed = parse(raw);
        if parsed.is_none() {
            self.reject(field, code);
        }
        parsed
    }

    fn patch<R, T>(
        &mut self,
        field: &'static str,
        raw: Patch<R>,
        code: ErrorCode,
        parse: impl FnOnce(R) -> Option<T>,
    ) -> Option<Patch<T>> {
        match raw {
            Patch::Absent => Some(Patch::Absent),
            Patch::Present(value) => {
                let parsed = parse(value);
                if parsed.is_none() {
                    self.reject(field, code);
                }
                parsed.map(Patch::Present)
            }
        }
    }

    pub(crate) fn uuid(&mut self, field: &'static str, raw: Option<&str>) -> Option<Uuid> {
        self.required(field, raw, ErrorCode::InvalidUuid, parse_uuid)
    }

    pub(crate) fn timestamp(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Option<DateTime<Utc>> {
        self.required(field, raw, ErrorCode::InvalidTimestamp, parse_timestamp)
    }

    pub(crate) fn amount(&mut self, field: &'static str, raw: Option<AmountInput>) -> Option<i64> {
        self.required(field, raw, ErrorCode::InvalidAmount, parse_amount)
    }

    pub(crate) fn category(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Option<ActivityCategory> {
        self.required(field, raw, ErrorCode::InvalidCategory, parse_category)
    }

    pub(crate) fn patch_uuid(
        &mut self,
        field: &'static str,
        raw: Patch<String>,
    ) -> Option<Patch<Uuid>> {
        self.patch(field, raw, ErrorCode::InvalidUuid, |value| parse_uuid(&value))
    }

    pub(crate) fn patch_timestamp(
        &mut self,
        field: &'static str,
        raw: Patch<String>,
    ) -> Option<Patch<DateTime<Utc>>> {
        self.patch(field, raw, ErrorCode::InvalidTimestamp, |value| {
            parse_timestamp(&value)
        })
    }

    pub(crate) fn patch_amount(
        &mut self,
        field: &'static str,
        raw: Patch<AmountInput>,
    ) -> Option<Patch<i64>> {
        self.patch(field, raw, ErrorCode::InvalidAmount, parse_amount)
    }

    pub(crate) fn patch_category(
        &mut self,
        field: &'static str,
        raw: Patch<String>,
    ) -> Option<Patch<ActivityCategory>> {
        self.patch(field, raw, ErrorCode::InvalidCategory, |value| {
            parse_category(&value)
        })
    }

    /// The accumulated failures as an "Invalid input" error.
    pub(crate) fn into_error(self) -> Error {
        Error::validation("Invalid input", self.0)
    }
}

/// Parse a UUID path segment.
pub(crate) fn path_uuid(field: &'static str, raw: &str) -> Result<Uuid, Error> {
    let mut fields = RequestFields::new();
    fields
        .uuid(field, Some(raw))
        .ok_or_else(|| fields.into_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2022-12-01", Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).single())]
    #[case("2022-12-01T09:30:00Z", Utc.with_ymd_and_hms(2022, 12, 1, 9, 30, 0).single())]
    #[case("2022-12-01T10:30:00+01:00", Utc.with_ymd_and_hms(2022, 12, 1, 9, 30, 0).single())]
    #[case("01/12/2022", None)]
    #[case("", None)]
    fn timestamps_accept_dates_and_rfc3339(
        #[case] raw: &str,
        #[case] expected: Option<DateTime<Utc>>,
    ) {
        assert_eq!(parse_timestamp(raw), expected);
    }

    #[rstest]
    #[case(AmountInput::Text("100".into()), Some(100))]
    #[case(AmountInput::Text(" 200 ".into()), Some(200))]
    #[case(AmountInput::Integer(-5), Some(-5))]
    #[case(AmountInput::Text("12.50".into()), None)]
    #[case(AmountInput::Text("lots".into()), None)]
    fn amounts_are_whole_numbers(#[case] raw: AmountInput, #[case] expected: Option<i64>) {
        assert_eq!(parse_amount(raw), expected);
    }

    #[rstest]
    fn amount_input_accepts_strings_and_numbers() {
        let text: AmountInput = serde_json::from_str(r#""100""#).expect("string amount");
        let number: AmountInput = serde_json::from_str("100").expect("numeric amount");
        assert_eq!(parse_amount(text), parse_amount(number));
    }

    #[rstest]
    fn every_failure_is_reported() {
        let mut fields = RequestFields::new();
        assert!(fields.uuid("tripId", Some("nope")).is_none());
        assert!(fields.timestamp("date", None).is_none());
        assert!(fields.category("category", Some("PICNIC")).is_none());

        let error = fields.into_error();
        let codes: Vec<(&str, &str)> = error
            .field_errors()
            .iter()
            .map(|e| (e.field(), e.code()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("tripId", "invalid_uuid"),
                ("date", "required"),
                ("category", "invalid_category"),
            ]
        );
    }

    #[rstest]
    fn absent_patches_pass_through() {
        let mut fields = RequestFields::new();
        assert_eq!(
            fields.patch_timestamp("startDate", Patch::Absent),
            Some(Patch::Absent)
        );
        assert_eq!(fields.patch_uuid("tripId", Patch::Present("x".into())), None);
        assert_eq!(fields.into_error().field_errors().len(), 1);
    }

    #[rstest]
    fn path_ids_must_be_uuids() {
        let error = path_uuid("id", "123").expect_err("not a uuid");
        assert_eq!(error.field_errors()[0].code(), "invalid_uuid");
        assert!(path_uuid("id", "3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    }
}
