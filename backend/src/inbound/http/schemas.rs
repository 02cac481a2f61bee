//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape so the generated document stays
//! accurate without coupling the domain to utoipa.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::FieldError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorSchema {
    /// Wire name of the offending field.
    #[schema(example = "startDate")]
    field: String,
    /// Machine-readable reason.
    #[schema(example = "invalid_timestamp")]
    code: String,
    /// Human-readable explanation.
    #[schema(example = "startDate must be a date or RFC 3339 timestamp")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::ActivityCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ActivityCategory)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub enum ActivityCategorySchema {
    #[schema(rename = "ACCOMMODATION")]
    Accommodation,
    #[schema(rename = "FOOD")]
    Food,
    #[schema(rename = "TRANSPORT")]
    Transport,
    #[schema(rename = "SIGHTSEEING")]
    Sightseeing,
    #[schema(rename = "SHOPPING")]
    Shopping,
    #[schema(rename = "OTHER")]
    Other,
}

/// Envelope without a payload: failures, and deletions.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageEnvelope {
    success: bool,
    #[schema(example = "Trip not found")]
    message: String,
    errors: Option<Vec<FieldErrorSchema>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn field_error_schema_names_the_domain_type() {
        assert_eq!(FieldErrorSchema::name(), "crate.domain.FieldError");
        assert!(schema_to_json::<FieldErrorSchema>().contains("field"));
    }

    #[test]
    fn category_schema_lists_wire_names() {
        let json = schema_to_json::<ActivityCategorySchema>();
        for name in ["ACCOMMODATION", "FOOD", "TRANSPORT", "SIGHTSEEING", "SHOPPING", "OTHER"] {
            assert!(json.contains(name), "missing {name}");
        }
    }
}
