//! # User API
//!
//! Registration and listing. Handlers validate, delegate to the
//! [`UserService`](crate::service::UserService) held in [`AppState`], and
//! shape the success response. Every failure is returned as an
//! [`AppError`] and rendered by the error translator.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use roster_core::{NewUser, User};
use roster_schema::USER_REGISTRATION_SCHEMA;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_validated_json;
use crate::state::AppState;

/// Success message for a registration.
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Registration payload. Fields beyond `email` are accepted and echoed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Email address; must be unique across users.
    pub email: String,
}

/// Registration response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserResponse {
    /// Always [`REGISTERED_MESSAGE`].
    pub message: String,
    /// The validated request payload, unchanged.
    #[schema(value_type = Object)]
    pub user: Value,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/api/users/register", post(register_user))
}

/// POST /api/users/register — Register a new user.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterUserResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody),
        (status = 500, description = "Unclassified failure", body = ErrorBody),
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), AppError> {
    let req = extract_validated_json::<RegisterUserRequest>(
        &state.schemas,
        USER_REGISTRATION_SCHEMA,
        body,
    )?;

    state
        .users
        .create_user(NewUser::new(req.value.email))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            message: REGISTERED_MESSAGE.to_string(),
            user: req.raw,
        }),
    ))
}

/// GET /users — List all users in registration order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 503, description = "Store unavailable", body = ErrorBody),
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}
