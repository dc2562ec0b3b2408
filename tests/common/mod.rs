//! Shared integration-test harness: the real router over in-memory SQLite
//! with a single-connection pool, plus seeded accounts.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use qctrack_api::{api, config::AppConfig, migrator::Migrator, AppState};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-which-is-long-enough";
pub const ADMIN_PASSWORD: &str = "admin123!";

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Fresh database with three accounts: admin (seeded), alice and bob.
    pub async fn new() -> Self {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "sqlite::memory:",
            "jwt_secret": TEST_JWT_SECRET,
            "admin_password": ADMIN_PASSWORD,
        }))
        .expect("test config");

        // One pooled connection: an in-memory SQLite database exists per
        // connection, so the pool must never open a second one.
        let mut opt = ConnectOptions::new(cfg.database_url.clone());
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("migrate");

        let state = Arc::new(AppState::new(Arc::new(db), cfg.clone()));
        state
            .services
            .users
            .seed_admin(&cfg)
            .await
            .expect("seed admin");
        state
            .services
            .users
            .create_user("alice", "pw123", "user")
            .await
            .expect("create alice");
        state
            .services
            .users
            .create_user("bob", "pw456", "user")
            .await
            .expect("create bob");

        let app = api::app(state.clone());
        Self { app, state }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.app.clone().oneshot(request).await.expect("response")
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login should succeed");
        let body = response_json(response).await;
        body["token"].as_str().expect("token in response").to_string()
    }
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
