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
    services::inspections::{CreateInspectionInput, InspectionRow, UpdateInspectionInput},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInspectionRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    #[serde(default)]
    pub company_name: String,

    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    #[serde(default)]
    pub product_name: String,

    #[validate(length(min = 1, max = 100, message = "Product code is required"))]
    #[serde(default)]
    pub product_code: String,

    pub inspected_quantity: Option<i32>,
    pub defective_quantity: Option<i32>,
    pub actioned_quantity: Option<i32>,
    pub defect_reason: Option<String>,
    pub solution: Option<String>,
    pub target_date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress_percentage: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInspectionRequest {
    pub inspected_quantity: Option<i32>,
    pub defective_quantity: Option<i32>,
    pub actioned_quantity: Option<i32>,
    pub defect_reason: Option<String>,
    pub solution: Option<String>,
    pub target_date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress_percentage: Option<i32>,
    pub status: Option<String>,
}

/// List all inspections
#[utoipa::path(
    get,
    path = "/api/inspections",
    responses(
        (status = 200, description = "All inspections, newest first", body = [InspectionRow]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn list_inspections(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.services.inspections.list().await?;
    Ok(success_response(rows))
}

/// List inspections authored by the current user
#[utoipa::path(
    get,
    path = "/api/my-inspections",
    responses(
        (status = 200, description = "Own inspections, newest first", body = [InspectionRow]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn list_my_inspections(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .inspections
        .list_for_user(current_user.user_id)
        .await?;
    Ok(success_response(rows))
}

/// Create an inspection
#[utoipa::path(
    post,
    path = "/api/inspections",
    request_body = CreateInspectionRequest,
    responses(
        (status = 201, description = "Inspection created"),
        (status = 400, description = "Missing required field", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn create_inspection(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<CreateInspectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let (Some(inspected_quantity), Some(defective_quantity)) =
        (payload.inspected_quantity, payload.defective_quantity)
    else {
        return Err(ApiError::ValidationError(
            "Required fields are missing".to_string(),
        ));
    };

    let model = state
        .services
        .inspections
        .create(
            &current_user,
            CreateInspectionInput {
                company_name: payload.company_name,
                product_name: payload.product_name,
                product_code: payload.product_code,
                inspected_quantity,
                defective_quantity,
                actioned_quantity: payload.actioned_quantity,
                defect_reason: payload.defect_reason,
                solution: payload.solution,
                target_date: payload.target_date,
                progress_percentage: payload.progress_percentage,
                status: payload.status,
            },
        )
        .await?;

    Ok(created_response(json!({
        "message": "Inspection added successfully",
        "id": model.id,
    })))
}

/// Get one inspection
#[utoipa::path(
    get,
    path = "/api/inspections/:id",
    params(("id" = i32, Path, description = "Inspection id")),
    responses(
        (status = 200, description = "Inspection returned", body = InspectionRow),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn get_inspection(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.services.inspections.get(id).await?;
    Ok(success_response(row))
}

/// Update an inspection (owner only); every changed field is logged to the
/// history of the record
#[utoipa::path(
    put,
    path = "/api/inspections/:id",
    params(("id" = i32, Path, description = "Inspection id")),
    request_body = UpdateInspectionRequest,
    responses(
        (status = 200, description = "Inspection updated"),
        (status = 400, description = "No valid fields to update", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn update_inspection(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInspectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .inspections
        .update(
            &current_user,
            id,
            UpdateInspectionInput {
                inspected_quantity: payload.inspected_quantity,
                defective_quantity: payload.defective_quantity,
                actioned_quantity: payload.actioned_quantity,
                defect_reason: payload.defect_reason,
                solution: payload.solution,
                target_date: payload.target_date,
                progress_percentage: payload.progress_percentage,
                status: payload.status,
            },
        )
        .await?;

    Ok(success_response(json!({
        "message": "Inspection updated successfully"
    })))
}

/// Delete an inspection (owner only)
#[utoipa::path(
    delete,
    path = "/api/inspections/:id",
    params(("id" = i32, Path, description = "Inspection id")),
    responses(
        (status = 200, description = "Inspection deleted"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn delete_inspection(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .inspections
        .delete(&current_user, id)
        .await?;

    Ok(success_response(json!({
        "message": "Inspection deleted successfully"
    })))
}

/// Creates the router for inspection endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/inspections",
            get(list_inspections).post(create_inspection),
        )
        .route("/my-inspections", get(list_my_inspections))
        .route(
            "/inspections/:id",
            get(get_inspection)
                .put(update_inspection)
                .delete(delete_inspection),
        )
}
