//! Authentication flow: login, token validation on protected routes,
//! expiry handling and password changes.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp, TEST_JWT_SECRET};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: i32,
    username: String,
    iat: i64,
    exp: i64,
}

#[tokio::test]
async fn login_returns_decodable_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "alice", "password": "pw123" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "alice");

    let token = body["token"].as_str().expect("token");
    let decoded = jsonwebtoken::decode::<TokenClaims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &jsonwebtoken::Validation::new(Algorithm::HS256),
    )
    .expect("token decodes with the server secret");
    assert_eq!(decoded.claims.username, "alice");
    assert_eq!(decoded.claims.sub, body["user"]["user_id"].as_i64().unwrap() as i32);
    // 24-hour validity window
    assert_eq!(decoded.claims.exp - decoded.claims.iat, 24 * 60 * 60);
}

#[tokio::test]
async fn login_with_wrong_password_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "alice", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_unknown_user_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "mallory", "password": "pw123" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_missing_fields_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "alice" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_stamps_last_login() {
    use qctrack_api::entities::{user, User};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    let app = TestApp::new().await;
    app.login("alice", "pw123").await;

    let alice = User::find()
        .filter(user::Column::Username.eq("alice"))
        .one(&*app.state.db)
        .await
        .expect("query")
        .expect("alice exists");
    assert!(alice.last_login.is_some());
}

#[tokio::test]
async fn protected_route_without_token_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/inspections", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_auth_scheme_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/inspections",
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A non-bearer scheme is treated as a missing token.
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/inspections")
        .header(axum::http::header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    use tower::ServiceExt;
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/inspections",
            None,
            Some("not.a.valid.token"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_rejected_with_expiry_code() {
    let app = TestApp::new().await;

    // Signed with the right secret but two hours past expiry, which clears
    // the decoder's leeway.
    let now = chrono::Utc::now().timestamp();
    let claims = TokenClaims {
        sub: 1,
        username: "alice".to_string(),
        iat: now - 3 * 60 * 60,
        exp: now - 2 * 60 * 60,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .request(Method::GET, "/api/inspections", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_TOKEN_EXPIRED");
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["info"]["title"], "QCTrack API");
}

#[tokio::test]
async fn change_password_flow() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    let response = app
        .request(
            Method::POST,
            "/api/change-password",
            Some(json!({ "current_password": "pw123", "new_password": "newpass1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, new one does.
    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "alice", "password": "pw123" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.login("alice", "newpass1").await;
}

#[tokio::test]
async fn change_password_requires_correct_current_password() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    let response = app
        .request(
            Method::POST,
            "/api/change-password",
            Some(json!({ "current_password": "wrong", "new_password": "newpass1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
