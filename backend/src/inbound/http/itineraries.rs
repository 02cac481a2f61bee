//! Itinerary endpoints. An itinerary is one planned day of a trip.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ApiResult, Error, Itinerary, ItineraryChanges, ItineraryDraft, ItineraryId, TripId,
};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RequestFields, path_uuid};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryBody {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Itinerary> for ItineraryBody {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            id: *itinerary.id.as_uuid(),
            trip_id: *itinerary.trip_id.as_uuid(),
            date: itinerary.date,
            created_at: itinerary.created_at,
            updated_at: itinerary.updated_at,
        }
    }
}

/// Body of both `POST /api/itineraries` and `PUT /api/itineraries/{id}`.
///
/// Updates must repeat the stored trip; an itinerary never moves between
/// trips.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryRequest {
    #[schema(value_type = Option<Uuid>)]
    pub trip_id: Option<String>,
    #[schema(example = "2022-12-02")]
    pub date: Option<String>,
}

impl ItineraryRequest {
    fn parse(self) -> Result<(TripId, DateTime<Utc>), Error> {
        let mut fields = RequestFields::new();
        let trip_id = fields.uuid("tripId", self.trip_id.as_deref());
        let date = fields.timestamp("date", self.date.as_deref());
        match (trip_id, date) {
            (Some(trip_id), Some(date)) => Ok((TripId::from_uuid(trip_id), date)),
            _ => Err(fields.into_error()),
        }
    }

    fn into_draft(self) -> Result<ItineraryDraft, Error> {
        let (trip_id, date) = self.parse()?;
        Ok(ItineraryDraft { trip_id, date })
    }

    fn into_changes(self) -> Result<ItineraryChanges, Error> {
        let (trip_id, date) = self.parse()?;
        Ok(ItineraryChanges { trip_id, date })
    }
}

fn itinerary_id(raw: &str) -> Result<ItineraryId, Error> {
    path_uuid("id", raw).map(ItineraryId::from_uuid)
}

/// List the itineraries of one trip, by date.
#[utoipa::path(
    get,
    path = "/api/itineraries/trips/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Itineraries", body = Envelope<Vec<ItineraryBody>>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Trip not found", body = MessageEnvelope)
    ),
    tags = ["itineraries"],
    operation_id = "listItineraries"
)]
#[get("/itineraries/trips/{trip_id}")]
pub async fn list_itineraries(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let trip_id = path_uuid("tripId", &path).map(TripId::from_uuid)?;
    let itineraries = state
        .lifecycle
        .list_itineraries(principal.id(), &trip_id)
        .await?;
    let body: Vec<ItineraryBody> = itineraries.into_iter().map(ItineraryBody::from).collect();
    Ok(envelope::ok("Itineraries successfully retrieved", body))
}

#[utoipa::path(
    post,
    path = "/api/itineraries",
    request_body = ItineraryRequest,
    responses(
        (status = 201, description = "Created itinerary", body = Envelope<ItineraryBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Trip not found", body = MessageEnvelope)
    ),
    tags = ["itineraries"],
    operation_id = "createItinerary"
)]
#[post("/itineraries")]
pub async fn create_itinerary(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    payload: web::Json<ItineraryRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let itinerary = state.lifecycle.create_itinerary(principal.id(), draft).await?;
    Ok(envelope::created(
        "Itinerary successfully created",
        ItineraryBody::from(itinerary),
    ))
}

#[utoipa::path(
    get,
    path = "/api/itineraries/{id}",
    params(("id" = Uuid, Path, description = "Itinerary identifier")),
    responses(
        (status = 200, description = "Itinerary", body = Envelope<ItineraryBody>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["itineraries"],
    operation_id = "getItinerary"
)]
#[get("/itineraries/{id}")]
pub async fn get_itinerary(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = itinerary_id(&path)?;
    let itinerary = state.lifecycle.get_itinerary(principal.id(), &id).await?;
    Ok(envelope::ok(
        "Itinerary successfully retrieved",
        ItineraryBody::from(itinerary),
    ))
}

#[utoipa::path(
    put,
    path = "/api/itineraries/{id}",
    params(("id" = Uuid, Path, description = "Itinerary identifier")),
    request_body = ItineraryRequest,
    responses(
        (status = 200, description = "Updated itinerary", body = Envelope<ItineraryBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden or trip changed", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["itineraries"],
    operation_id = "updateItinerary"
)]
#[put("/itineraries/{id}")]
pub async fn update_itinerary(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ItineraryRequest>,
) -> ApiResult<HttpResponse> {
    let id = itinerary_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let itinerary = state
        .lifecycle
        .update_itinerary(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok(
        "Itinerary successfully updated",
        ItineraryBody::from(itinerary),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/itineraries/{id}",
    params(("id" = Uuid, Path, description = "Itinerary identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["itineraries"],
    operation_id = "deleteItinerary"
)]
#[delete("/itineraries/{id}")]
pub async fn delete_itinerary(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = itinerary_id(&path)?;
    state.lifecycle.delete_itinerary(principal.id(), &id).await?;
    Ok(envelope::done("Itinerary successfully deleted"))
}
