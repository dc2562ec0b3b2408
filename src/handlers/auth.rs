use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{success_response, validate_input};
use crate::{
    auth::CurrentUser,
    errors::{ApiError, ServiceError},
    handlers::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,

    /// New password (minimum 6 characters)
    #[validate(length(min = 6, message = "New password must be at least 6 characters long"))]
    #[serde(default)]
    pub new_password: String,
}

/// Log in with username and password, receiving a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token returned"),
        (status = 400, description = "Missing credentials", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::ValidationError(
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .services
        .users
        .verify_login(&payload.username, &payload.password)
        .await?;

    let token = state
        .auth
        .issue_token(&user)
        .map_err(|e| ApiError::ServiceError(ServiceError::InternalError(e.to_string())))?;

    Ok(success_response(json!({
        "message": "Login successful",
        "token": token,
        "user": { "user_id": user.id, "username": user.username },
    })))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    if payload.current_password.is_empty() {
        return Err(ApiError::ValidationError(
            "Current password is required".to_string(),
        ));
    }

    state
        .services
        .users
        .change_password(
            current_user.user_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(success_response(json!({
        "message": "Password changed successfully"
    })))
}
