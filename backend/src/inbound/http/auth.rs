//! Public account endpoints: registration and login.
//!
//! ```text
//! POST /auth/register {"name":"Ana","email":"ana@example.com","password":"pw","confirmPassword":"pw"}
//! POST /auth/login {"email":"ana@example.com","password":"pw"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, LoginCredentials, Registration};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserBody;

/// Registration request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token issued on login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenBody {
    pub token: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Envelope<UserBody>),
        (status = 400, description = "Invalid input or email taken", body = MessageEnvelope),
        (status = 500, description = "Internal server error", body = MessageEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = Registration::try_from_parts(
        &body.name,
        &body.email,
        &body.password,
        &body.confirm_password,
    )?;
    let user = state.accounts.register(registration).await?;
    Ok(envelope::created(
        "User successfully registered",
        UserBody::from(user),
    ))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Envelope<TokenBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Invalid password", body = MessageEnvelope),
        (status = 404, description = "User not found", body = MessageEnvelope),
        (status = 500, description = "Internal server error", body = MessageEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(envelope::ok(
        "Login successful",
        TokenBody {
            token: session.token,
        },
    ))
}
