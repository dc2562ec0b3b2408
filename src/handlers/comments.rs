use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
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
    errors::ApiError,
    handlers::AppState,
    services::{comments::CommentRow, ParentType},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    /// "inspection" or "quality"
    #[serde(default)]
    pub parent_type: String,

    pub parent_id: Option<i32>,

    #[validate(length(min = 1, message = "Comment content is required"))]
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment content is required"))]
    #[serde(default)]
    pub content: String,
}

/// List the comments of one inspection or quality-improvement item
#[utoipa::path(
    get,
    path = "/api/comments/:parent_type/:parent_id",
    params(
        ("parent_type" = String, Path, description = "\"inspection\" or \"quality\""),
        ("parent_id" = i32, Path, description = "Parent record id")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = [CommentRow]),
        (status = 400, description = "Invalid parent type", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Path((parent_type, parent_id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let parent: ParentType = parent_type.parse().map_err(ApiError::ServiceError)?;
    let rows = state.services.comments.list(parent, parent_id).await?;
    Ok(success_response(rows))
}

/// Add a comment to an inspection or quality-improvement item
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added"),
        (status = 400, description = "Invalid parent type or empty content", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "comments"
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let parent: ParentType = payload
        .parent_type
        .parse()
        .map_err(ApiError::ServiceError)?;
    let Some(parent_id) = payload.parent_id else {
        return Err(ApiError::ValidationError(
            "Parent id is required".to_string(),
        ));
    };

    let model = state
        .services
        .comments
        .add(&current_user, parent, parent_id, payload.content)
        .await?;

    Ok(created_response(json!({
        "message": "Comment added successfully",
        "id": model.id,
    })))
}

/// Edit a comment (author only)
#[utoipa::path(
    put,
    path = "/api/comments/:id",
    params(("id" = i32, Path, description = "Comment id")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated"),
        (status = 400, description = "Empty content", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "comments"
)]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .comments
        .update(&current_user, id, payload.content)
        .await?;

    Ok(success_response(json!({
        "message": "Comment updated successfully"
    })))
}

/// Delete a comment (author only)
#[utoipa::path(
    delete,
    path = "/api/comments/:id",
    params(("id" = i32, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.comments.delete(&current_user, id).await?;

    Ok(success_response(json!({
        "message": "Comment deleted successfully"
    })))
}

/// Creates the router for comment endpoints. The router allows only one
/// parameter name per path position, so the list route reuses `:id` for its
/// parent-type segment; the handler extracts positionally.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments", post(create_comment))
        .route(
            "/comments/:id",
            axum::routing::put(update_comment).delete(delete_comment),
        )
        .route("/comments/:id/:parent_id", get(list_comments))
}
