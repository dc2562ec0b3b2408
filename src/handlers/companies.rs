use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use super::common::success_response;
use crate::{auth::CurrentUser, errors::ApiError, handlers::AppState, services::reference};

/// List all companies (for dropdown/filter use)
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Companies ordered by name"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let companies = reference::list_companies(&state.db).await?;
    Ok(success_response(companies))
}

/// Creates the router for company endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/companies", get(list_companies))
}
