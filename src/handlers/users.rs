use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, success_response, validate_input};
use crate::{
    auth::CurrentUser,
    entities::user::ROLE_USER,
    errors::ApiError,
    handlers::AppState,
    services::users::UserSummary,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    #[serde(default)]
    pub username: String,

    /// Password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[serde(default)]
    pub password: String,

    /// "admin" or "user"; defaults to "user"
    pub role: Option<String>,
}

/// List all users (for dropdown/filter use)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users ordered by name", body = [UserSummary]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.services.users.list().await?;
    Ok(success_response(users))
}

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .users
        .ensure_admin(current_user.user_id)
        .await?;

    let role = payload.role.as_deref().unwrap_or(ROLE_USER);
    let model = state
        .services
        .users
        .create_user(&payload.username, &payload.password, role)
        .await?;

    Ok(created_response(json!({
        "message": "User created successfully",
        "id": model.id,
    })))
}

/// Delete a user (admin only; blocked while the user owns records)
#[utoipa::path(
    delete,
    path = "/api/users/:id",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Attempted self-deletion", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "User still owns records", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.users.delete_user(&current_user, id).await?;

    Ok(success_response(json!({
        "message": "User deleted successfully"
    })))
}

/// Creates the router for user endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", axum::routing::delete(delete_user))
}
