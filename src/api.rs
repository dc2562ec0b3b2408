use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{auth, handlers, openapi::ApiDoc, AppState};

/// Assemble the full application router. Everything under `/api` except
/// login sits behind the bearer-token middleware.
pub fn app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(handlers::inspections::routes())
        .merge(handlers::quality::routes())
        .merge(handlers::comments::routes())
        .merge(handlers::histories::routes())
        .merge(handlers::users::routes())
        .merge(handlers::companies::routes())
        .route("/change-password", post(handlers::auth::change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let api = Router::new()
        .route("/login", post(handlers::auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_spec))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
