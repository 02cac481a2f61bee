//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer along with
//! the bearer-token security scheme. Schemas reachable from the registered
//! paths are collected automatically; the wrappers in
//! [`schemas`](crate::inbound::http::schemas) describe domain types without
//! coupling them to utoipa.
//!
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ActivityCategorySchema, FieldErrorSchema, MessageEnvelope};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Travel planner API",
        description = "Trips, itineraries, activities, expenses and reminders for registered travellers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::itineraries::list_itineraries,
        crate::inbound::http::itineraries::create_itinerary,
        crate::inbound::http::itineraries::get_itinerary,
        crate::inbound::http::itineraries::update_itinerary,
        crate::inbound::http::itineraries::delete_itinerary,
        crate::inbound::http::activities::list_activities,
        crate::inbound::http::activities::create_activity,
        crate::inbound::http::activities::get_activity,
        crate::inbound::http::activities::update_activity,
        crate::inbound::http::activities::delete_activity,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::create_expense,
        crate::inbound::http::expenses::get_expense,
        crate::inbound::http::expenses::update_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::reminders::list_reminders,
        crate::inbound::http::reminders::create_reminder,
        crate::inbound::http::reminders::get_reminder,
        crate::inbound::http::reminders::update_reminder,
        crate::inbound::http::reminders::delete_reminder,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(FieldErrorSchema, ActivityCategorySchema, MessageEnvelope)),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Account profiles"),
        (name = "trips", description = "Trips owned by the caller"),
        (name = "itineraries", description = "Planned days of a trip"),
        (name = "activities", description = "Scheduled activities of an itinerary"),
        (name = "expenses", description = "Costs attached to an activity"),
        (name = "reminders", description = "Time-based reminders for a trip"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
