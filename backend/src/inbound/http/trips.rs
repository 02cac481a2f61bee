//! Trip endpoints.
//!
//! ```text
//! GET    /api/trips
//! POST   /api/trips {"title":"Lisbon","destination":"Portugal","startDate":"2022-12-01","endDate":"2022-12-10"}
//! GET    /api/trips/{id}
//! PUT    /api/trips/{id} {"endDate":"2022-12-12"}
//! DELETE /api/trips/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ApiResult, Error, Patch, Trip, TripChanges, TripDraft, TripId};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RequestFields, path_uuid};

/// Wire form of a trip.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripBody {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Trip> for TripBody {
    fn from(trip: Trip) -> Self {
        Self {
            id: *trip.id.as_uuid(),
            user_id: *trip.user_id.as_uuid(),
            title: trip.title,
            description: trip.description,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

/// Body of `POST /api/trips`. The owner is always the caller.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTripRequest {
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    #[schema(example = "2022-12-01")]
    pub start_date: Option<String>,
    #[schema(example = "2022-12-10")]
    pub end_date: Option<String>,
}

impl CreateTripRequest {
    fn into_draft(self) -> Result<TripDraft, Error> {
        let mut fields = RequestFields::new();
        let start_date = fields.timestamp("startDate", self.start_date.as_deref());
        let end_date = fields.timestamp("endDate", self.end_date.as_deref());
        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            return Err(fields.into_error());
        };
        Ok(TripDraft {
            title: self.title,
            description: self.description,
            destination: self.destination,
            start_date,
            end_date,
        })
    }
}

/// Body of `PUT /api/trips/{id}`; omitted keys keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub destination: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub start_date: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub end_date: Patch<String>,
}

impl UpdateTripRequest {
    fn into_changes(self) -> Result<TripChanges, Error> {
        let mut fields = RequestFields::new();
        let start_date = fields.patch_timestamp("startDate", self.start_date);
        let end_date = fields.patch_timestamp("endDate", self.end_date);
        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            return Err(fields.into_error());
        };
        Ok(TripChanges {
            title: self.title,
            description: self.description,
            destination: self.destination,
            start_date,
            end_date,
        })
    }
}

fn trip_id(raw: &str) -> Result<TripId, Error> {
    path_uuid("id", raw).map(TripId::from_uuid)
}

/// List the caller's trips, earliest first.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Trips", body = Envelope<Vec<TripBody>>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope)
    ),
    tags = ["trips"],
    operation_id = "listTrips"
)]
#[get("/trips")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let trips = state.lifecycle.list_trips(principal.id()).await?;
    let body: Vec<TripBody> = trips.into_iter().map(TripBody::from).collect();
    Ok(envelope::ok("Trips successfully retrieved", body))
}

/// Create a trip.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Created trip", body = Envelope<TripBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 404, description = "Account no longer exists", body = MessageEnvelope)
    ),
    tags = ["trips"],
    operation_id = "createTrip"
)]
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let trip = state.lifecycle.create_trip(principal.id(), draft).await?;
    Ok(envelope::created("Trip successfully created", TripBody::from(trip)))
}

/// Fetch one trip.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    params(("id" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip", body = Envelope<TripBody>),
        (status = 400, description = "Invalid id", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["trips"],
    operation_id = "getTrip"
)]
#[get("/trips/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = trip_id(&path)?;
    let trip = state.lifecycle.get_trip(principal.id(), &id).await?;
    Ok(envelope::ok("Trip successfully retrieved", TripBody::from(trip)))
}

/// Partially update a trip.
#[utoipa::path(
    put,
    path = "/api/trips/{id}",
    params(("id" = Uuid, Path, description = "Trip identifier")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Updated trip", body = Envelope<TripBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["trips"],
    operation_id = "updateTrip"
)]
#[put("/trips/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<HttpResponse> {
    let id = trip_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let trip = state
        .lifecycle
        .update_trip(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok("Trip successfully updated", TripBody::from(trip)))
}

/// Delete a trip with its itineraries, activities, expenses and reminders.
#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    params(("id" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 400, description = "Invalid id", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip"
)]
#[delete("/trips/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = trip_id(&path)?;
    state.lifecycle.delete_trip(principal.id(), &id).await?;
    Ok(envelope::done("Trip successfully deleted"))
}
