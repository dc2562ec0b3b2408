use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, success_response, validate_input};
use crate::{
    auth::CurrentUser,
    errors::ApiError,
    handlers::AppState,
    services::quality::{CreateQualityInput, QualityRow, UpdateQualityInput},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQualityRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    #[serde(default)]
    pub company_name: String,

    #[validate(length(min = 1, message = "Improvement item is required"))]
    #[serde(default)]
    pub item_description: String,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQualityRequest {
    pub item_description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,
    pub status: Option<String>,
}

/// List all quality-improvement items
#[utoipa::path(
    get,
    path = "/api/quality-improvements",
    responses(
        (status = 200, description = "All items, newest first", body = [QualityRow]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn list_quality_improvements(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.services.quality.list().await?;
    Ok(success_response(rows))
}

/// List quality-improvement items authored by the current user
#[utoipa::path(
    get,
    path = "/api/my-quality-improvements",
    responses(
        (status = 200, description = "Own items, newest first", body = [QualityRow]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn list_my_quality_improvements(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .quality
        .list_for_user(current_user.user_id)
        .await?;
    Ok(success_response(rows))
}

/// Create a quality-improvement item
#[utoipa::path(
    post,
    path = "/api/quality-improvements",
    request_body = CreateQualityRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Missing required field", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn create_quality_improvement(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<CreateQualityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let model = state
        .services
        .quality
        .create(
            &current_user,
            CreateQualityInput {
                company_name: payload.company_name,
                item_description: payload.item_description,
                start_date: payload.start_date,
                end_date: payload.end_date,
                progress: payload.progress,
                status: payload.status,
            },
        )
        .await?;

    Ok(created_response(json!({
        "message": "Quality improvement added successfully",
        "id": model.id,
    })))
}

/// Get one quality-improvement item
#[utoipa::path(
    get,
    path = "/api/quality-improvements/:id",
    params(("id" = i32, Path, description = "Quality improvement id")),
    responses(
        (status = 200, description = "Item returned", body = QualityRow),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn get_quality_improvement(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.services.quality.get(id).await?;
    Ok(success_response(row))
}

/// Update a quality-improvement item (owner only)
#[utoipa::path(
    put,
    path = "/api/quality-improvements/:id",
    params(("id" = i32, Path, description = "Quality improvement id")),
    request_body = UpdateQualityRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "No valid fields to update", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn update_quality_improvement(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQualityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .quality
        .update(
            &current_user,
            id,
            UpdateQualityInput {
                item_description: payload.item_description,
                start_date: payload.start_date,
                end_date: payload.end_date,
                progress: payload.progress,
                status: payload.status,
            },
        )
        .await?;

    Ok(success_response(json!({
        "message": "Quality improvement updated successfully"
    })))
}

/// Delete a quality-improvement item (owner only)
#[utoipa::path(
    delete,
    path = "/api/quality-improvements/:id",
    params(("id" = i32, Path, description = "Quality improvement id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quality-improvements"
)]
pub async fn delete_quality_improvement(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.quality.delete(&current_user, id).await?;

    Ok(success_response(json!({
        "message": "Quality improvement deleted successfully"
    })))
}

/// Creates the router for quality-improvement endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/quality-improvements",
            get(list_quality_improvements).post(create_quality_improvement),
        )
        .route(
            "/my-quality-improvements",
            get(list_my_quality_improvements),
        )
        .route(
            "/quality-improvements/:id",
            get(get_quality_improvement)
                .put(update_quality_improvement)
                .delete(delete_quality_improvement),
        )
}
