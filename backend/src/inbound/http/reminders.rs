//! Reminder endpoints.
//!
//! Reminders belong to the caller and point at one of the caller's trips.
//! A `userId` in the body is accepted for compatibility but must name the
//! caller.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ApiResult, Error, Patch, Reminder, ReminderChanges, ReminderDraft, ReminderId, TripId, UserId,
};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RequestFields, path_uuid};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBody {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub message: String,
    pub time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderBody {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: *reminder.id.as_uuid(),
            user_id: *reminder.user_id.as_uuid(),
            trip_id: *reminder.trip_id.as_uuid(),
            message: reminder.message,
            time: reminder.time,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReminderRequest {
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<String>,
    #[schema(value_type = Option<Uuid>)]
    pub trip_id: Option<String>,
    pub message: String,
    #[schema(example = "2022-11-30T08:00:00Z")]
    pub time: Option<String>,
}

impl CreateReminderRequest {
    fn into_draft(self) -> Result<ReminderDraft, Error> {
        let mut fields = RequestFields::new();
        let user_id = optional_uuid(&mut fields, "userId", self.user_id);
        let trip_id = fields.uuid("tripId", self.trip_id.as_deref());
        let time = fields.timestamp("time", self.time.as_deref());
        let (Some(user_id), Some(trip_id), Some(time)) = (user_id, trip_id, time) else {
            return Err(fields.into_error());
        };
        Ok(ReminderDraft {
            claimed_owner: user_id.map(UserId::from_uuid),
            trip_id: TripId::from_uuid(trip_id),
            message: self.message,
            time,
        })
    }
}

/// Partial update. `tripId` is required and must match the stored trip.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderRequest {
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Uuid)]
    pub trip_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub message: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub time: Patch<String>,
}

impl UpdateReminderRequest {
    fn into_changes(self) -> Result<ReminderChanges, Error> {
        let mut fields = RequestFields::new();
        let user_id = optional_uuid(&mut fields, "userId", self.user_id);
        let trip_id = fields.uuid("tripId", self.trip_id.as_deref());
        let time = fields.patch_timestamp("time", self.time);
        let (Some(user_id), Some(trip_id), Some(time)) = (user_id, trip_id, time) else {
            return Err(fields.into_error());
        };
        Ok(ReminderChanges {
            claimed_owner: user_id.map(UserId::from_uuid),
            trip_id: TripId::from_uuid(trip_id),
            message: self.message,
            time,
        })
    }
}

/// Parse an optional id: `Some(None)` when absent, `None` when malformed.
fn optional_uuid(
    fields: &mut RequestFields,
    field: &'static str,
    raw: Option<String>,
) -> Option<Option<Uuid>> {
    match raw {
        None => Some(None),
        Some(raw) => fields.uuid(field, Some(&raw)).map(Some),
    }
}

fn reminder_id(raw: &str) -> Result<ReminderId, Error> {
    path_uuid("id", raw).map(ReminderId::from_uuid)
}

/// List the caller's reminders, soonest first.
#[utoipa::path(
    get,
    path = "/api/reminders",
    responses(
        (status = 200, description = "Reminders", body = Envelope<Vec<ReminderBody>>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope)
    ),
    tags = ["reminders"],
    operation_id = "listReminders"
)]
#[get("/reminders")]
pub async fn list_reminders(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let reminders = state.lifecycle.list_reminders(principal.id()).await?;
    let body: Vec<ReminderBody> = reminders.into_iter().map(ReminderBody::from).collect();
    Ok(envelope::ok("Reminders successfully retrieved", body))
}

#[utoipa::path(
    post,
    path = "/api/reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Created reminder", body = Envelope<ReminderBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Trip not found", body = MessageEnvelope)
    ),
    tags = ["reminders"],
    operation_id = "createReminder"
)]
#[post("/reminders")]
pub async fn create_reminder(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    payload: web::Json<CreateReminderRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let reminder = state.lifecycle.create_reminder(principal.id(), draft).await?;
    Ok(envelope::created(
        "Reminder successfully created",
        ReminderBody::from(reminder),
    ))
}

#[utoipa::path(
    get,
    path = "/api/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder identifier")),
    responses(
        (status = 200, description = "Reminder", body = Envelope<ReminderBody>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["reminders"],
    operation_id = "getReminder"
)]
#[get("/reminders/{id}")]
pub async fn get_reminder(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = reminder_id(&path)?;
    let reminder = state.lifecycle.get_reminder(principal.id(), &id).await?;
    Ok(envelope::ok(
        "Reminder successfully retrieved",
        ReminderBody::from(reminder),
    ))
}

#[utoipa::path(
    put,
    path = "/api/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder identifier")),
    request_body = UpdateReminderRequest,
    responses(
        (status = 200, description = "Updated reminder", body = Envelope<ReminderBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden or trip changed", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["reminders"],
    operation_id = "updateReminder"
)]
#[put("/reminders/{id}")]
pub async fn update_reminder(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateReminderRequest>,
) -> ApiResult<HttpResponse> {
    let id = reminder_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let reminder = state
        .lifecycle
        .update_reminder(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok(
        "Reminder successfully updated",
        ReminderBody::from(reminder),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["reminders"],
    operation_id = "deleteReminder"
)]
#[delete("/reminders/{id}")]
pub async fn delete_reminder(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = reminder_id(&path)?;
    state.lifecycle.delete_reminder(principal.id(), &id).await?;
    Ok(envelope::done("Reminder successfully deleted"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const TRIP: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    fn body_user_is_carried_to_the_domain() {
        let claimed = UserId::random();
        let request: CreateReminderRequest = serde_json::from_value(json!({
            "userId": claimed.to_string(),
            "tripId": TRIP,
            "message": "Pack",
            "time": "2022-11-30",
        }))
        .expect("valid body");
        let draft = request.into_draft().expect("valid draft");
        assert_eq!(draft.claimed_owner, Some(claimed));
        assert_eq!(draft.trip_id.to_string(), TRIP);
    }

    #[rstest]
    fn body_user_may_be_omitted() {
        let request: CreateReminderRequest = serde_json::from_value(
            json!({"tripId": TRIP, "message": "Pack", "time": "2022-11-30"}),
        )
        .expect("valid body");
        let draft = request.into_draft().expect("valid draft");
        assert_eq!(draft.claimed_owner, None);
    }

    #[rstest]
    fn updates_must_name_the_trip() {
        let request: UpdateReminderRequest =
            serde_json::from_value(json!({"message": "Pack"})).expect("valid body");
        let err = request.into_changes().expect_err("tripId missing");
        assert_eq!(err.field_errors()[0].field(), "tripId");
        assert_eq!(err.field_errors()[0].code(), "required");
    }
}
