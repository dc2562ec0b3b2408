use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

use super::common::success_response;
use crate::{
    auth::CurrentUser,
    errors::ApiError,
    handlers::AppState,
    services::{histories::HistoryRow, ParentType},
};

/// List the change history of one inspection or quality-improvement item
#[utoipa::path(
    get,
    path = "/api/histories/:parent_type/:parent_id",
    params(
        ("parent_type" = String, Path, description = "\"inspection\" or \"quality\""),
        ("parent_id" = i32, Path, description = "Parent record id")
    ),
    responses(
        (status = 200, description = "History entries, newest first", body = [HistoryRow]),
        (status = 400, description = "Invalid parent type", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "histories"
)]
pub async fn list_histories(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Path((parent_type, parent_id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let parent: ParentType = parent_type.parse().map_err(ApiError::ServiceError)?;
    let rows = state.services.histories.list(parent, parent_id).await?;
    Ok(success_response(rows))
}

/// Creates the router for history endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/histories/:parent_type/:parent_id", get(list_histories))
}
