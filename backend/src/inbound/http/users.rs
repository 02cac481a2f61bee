//! Account profile endpoints.
//!
//! ```text
//! GET    /api/users/{id}
//! PUT    /api/users/{id} {"name":"Ana","phoneNumber":null}
//! DELETE /api/users/{id} {"password":"..."}
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{ApiResult, Email, Error, Patch, User, UserChanges, UserId};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::path_uuid;

/// Public view of a user. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(rename = "profilePictureURL")]
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name,
            email: user.email.as_str().to_owned(),
            phone_number: user.phone_number,
            profile_picture_url: user.profile_picture_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update. Omitted keys keep their stored value; `null`
/// clears an optional one.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone_number: Patch<Option<String>>,
    #[serde(default, rename = "profilePictureURL")]
    #[schema(value_type = Option<String>)]
    pub profile_picture_url: Patch<Option<String>>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> Result<UserChanges, Error> {
        let email = self
            .email
            .try_map(|raw| Email::new(raw.trim()))
            .map_err(|err| Error::invalid_field("Invalid input", err.to_field_error()))?;
        Ok(UserChanges {
            name: self.name,
            email,
            phone_number: self.phone_number,
            profile_picture_url: self.profile_picture_url,
        })
    }
}

/// Account deletion body.
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeleteUserRequest {
    pub password: String,
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    path_uuid("id", raw).map(UserId::from_uuid)
}

/// Fetch a user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = Envelope<UserBody>),
        (status = 400, description = "Invalid id", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let user = state.lifecycle.get_user(principal.id(), &id).await?;
    Ok(envelope::ok("User successfully retrieved", UserBody::from(user)))
}

/// Update a user profile.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = Envelope<UserBody>),
        (status = 400, description = "Invalid input or email taken", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let user = state
        .lifecycle
        .update_user(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok("User successfully updated", UserBody::from(user)))
}

/// Delete an account and everything it owns.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 400, description = "Password is required", body = MessageEnvelope),
        (status = 401, description = "Invalid password", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<DeleteUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let password = Zeroizing::new(payload.into_inner().password);
    state
        .lifecycle
        .delete_user(principal.id(), &id, password.as_str())
        .await?;
    Ok(envelope::done("User successfully deleted"))
}
