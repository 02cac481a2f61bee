//! Activity endpoints.
//!
//! Activities carry a category from a closed set and a free-form `detail`
//! object for category-specific data (a flight number, a booking
//! reference). The server stores `detail` without interpreting it.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Activity, ActivityCategory, ActivityChanges, ActivityDetail, ActivityDraft, ActivityId,
    ApiResult, Error, ItineraryId, Patch,
};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::{ActivityCategorySchema, MessageEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RequestFields, path_uuid};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBody {
    pub id: Uuid,
    pub itinerary_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[schema(value_type = ActivityCategorySchema)]
    pub category: ActivityCategory,
    #[schema(value_type = Object)]
    pub detail: ActivityDetail,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Activity> for ActivityBody {
    fn from(activity: Activity) -> Self {
        Self {
            id: *activity.id.as_uuid(),
            itinerary_id: *activity.itinerary_id.as_uuid(),
            title: activity.title,
            description: activity.description,
            location: activity.location,
            start_time: activity.start_time,
            end_time: activity.end_time,
            category: activity.category,
            detail: activity.detail,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateActivityRequest {
    #[schema(value_type = Option<Uuid>)]
    pub itinerary_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    #[schema(example = "2022-12-02T09:00:00Z")]
    pub start_time: Option<String>,
    #[schema(example = "2022-12-02T11:00:00Z")]
    pub end_time: Option<String>,
    #[schema(value_type = Option<ActivityCategorySchema>)]
    pub category: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub detail: Option<ActivityDetail>,
}

impl CreateActivityRequest {
    fn into_draft(self) -> Result<ActivityDraft, Error> {
        let mut fields = RequestFields::new();
        let itinerary_id = fields.uuid("itineraryId", self.itinerary_id.as_deref());
        let start_time = fields.timestamp("startTime", self.start_time.as_deref());
        let end_time = fields.timestamp("endTime", self.end_time.as_deref());
        let category = fields.category("category", self.category.as_deref());
        let (Some(itinerary_id), Some(start_time), Some(end_time), Some(category)) =
            (itinerary_id, start_time, end_time, category)
        else {
            return Err(fields.into_error());
        };
        Ok(ActivityDraft {
            itinerary_id: ItineraryId::from_uuid(itinerary_id),
            title: self.title,
            description: self.description,
            location: self.location,
            start_time,
            end_time,
            category,
            detail: self.detail.unwrap_or_default(),
        })
    }
}

/// Partial update. A `null` detail clears it to an empty object.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub itinerary_id: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub location: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub start_time: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub end_time: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<ActivityCategorySchema>)]
    pub category: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub detail: Patch<Option<ActivityDetail>>,
}

impl UpdateActivityRequest {
    fn into_changes(self) -> Result<ActivityChanges, Error> {
        let mut fields = RequestFields::new();
        let itinerary_id = fields.patch_uuid("itineraryId", self.itinerary_id);
        let start_time = fields.patch_timestamp("startTime", self.start_time);
        let end_time = fields.patch_timestamp("endTime", self.end_time);
        let category = fields.patch_category("category", self.category);
        let (Some(itinerary_id), Some(start_time), Some(end_time), Some(category)) =
            (itinerary_id, start_time, end_time, category)
        else {
            return Err(fields.into_error());
        };
        Ok(ActivityChanges {
            itinerary_id: itinerary_id.map(ItineraryId::from_uuid),
            title: self.title,
            description: self.description,
            location: self.location,
            start_time,
            end_time,
            category,
            detail: self.detail.map(Option::unwrap_or_default),
        })
    }
}

fn activity_id(raw: &str) -> Result<ActivityId, Error> {
    path_uuid("id", raw).map(ActivityId::from_uuid)
}

#[utoipa::path(
    get,
    path = "/api/activities/itineraries/{itineraryId}",
    params(("itineraryId" = Uuid, Path, description = "Itinerary identifier")),
    responses(
        (status = 200, description = "Activities", body = Envelope<Vec<ActivityBody>>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Itinerary not found", body = MessageEnvelope)
    ),
    tags = ["activities"],
    operation_id = "listActivities"
)]
#[get("/activities/itineraries/{itinerary_id}")]
pub async fn list_activities(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let itinerary_id = path_uuid("itineraryId", &path).map(ItineraryId::from_uuid)?;
    let activities = state
        .lifecycle
        .list_activities(principal.id(), &itinerary_id)
        .await?;
    let body: Vec<ActivityBody> = activities.into_iter().map(ActivityBody::from).collect();
    Ok(envelope::ok("Activities successfully retrieved", body))
}

#[utoipa::path(
    post,
    path = "/api/activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Created activity", body = Envelope<ActivityBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Itinerary not found", body = MessageEnvelope)
    ),
    tags = ["activities"],
    operation_id = "createActivity"
)]
#[post("/activities")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    payload: web::Json<CreateActivityRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let activity = state.lifecycle.create_activity(principal.id(), draft).await?;
    Ok(envelope::created(
        "Activity successfully created",
        ActivityBody::from(activity),
    ))
}

#[utoipa::path(
    get,
    path = "/api/activities/{id}",
    params(("id" = Uuid, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Activity", body = Envelope<ActivityBody>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["activities"],
    operation_id = "getActivity"
)]
#[get("/activities/{id}")]
pub async fn get_activity(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = activity_id(&path)?;
    let activity = state.lifecycle.get_activity(principal.id(), &id).await?;
    Ok(envelope::ok(
        "Activity successfully retrieved",
        ActivityBody::from(activity),
    ))
}

#[utoipa::path(
    put,
    path = "/api/activities/{id}",
    params(("id" = Uuid, Path, description = "Activity identifier")),
    request_body = UpdateActivityRequest,
    responses(
        (status = 200, description = "Updated activity", body = Envelope<ActivityBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden or itinerary changed", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["activities"],
    operation_id = "updateActivity"
)]
#[put("/activities/{id}")]
pub async fn update_activity(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateActivityRequest>,
) -> ApiResult<HttpResponse> {
    let id = activity_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let activity = state
        .lifecycle
        .update_activity(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok(
        "Activity successfully updated",
        ActivityBody::from(activity),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    params(("id" = Uuid, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["activities"],
    operation_id = "deleteActivity"
)]
#[delete("/activities/{id}")]
pub async fn delete_activity(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = activity_id(&path)?;
    state.lifecycle.delete_activity(principal.id(), &id).await?;
    Ok(envelope::done("Activity successfully deleted"))
}
