//! Quality-improvement lifecycle: lazy company creation, audited updates
//! and owner-only write permission, mirroring the inspection semantics.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::json;

async fn create_item(app: &TestApp, token: &str) -> i64 {
    let response = app
        .request(
            Method::POST,
            "/api/quality-improvements",
            Some(json!({
                "company_name": "Acme",
                "item_description": "Reduce surface defects on panel line",
                "start_date": "2025-08-01",
                "end_date": "2025-09-30",
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["id"].as_i64().expect("created id")
}

#[tokio::test]
async fn create_and_list_joined() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    create_item(&app, &token).await;

    let response = app
        .request(
            Method::GET,
            "/api/quality-improvements",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rows = response_json(response).await;
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "alice");
    assert_eq!(rows[0]["company_name"], "Acme");
    assert_eq!(rows[0]["progress"], 0);
    assert_eq!(rows[0]["status"], "inProgress");
    assert_eq!(rows[0]["start_date"], "2025-08-01");
}

#[tokio::test]
async fn create_without_description_rejected() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    let response = app
        .request(
            Method::POST,
            "/api/quality-improvements",
            Some(json!({ "company_name": "Acme" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_logs_changed_fields_to_quality_history() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;
    let id = create_item(&app, &token).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/quality-improvements/{}", id),
            Some(json!({ "progress": 75 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            &format!("/api/histories/quality/{}", id),
            None,
            Some(&token),
        )
        .await;
    let histories = response_json(response).await;
    let histories = histories.as_array().expect("array");
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0]["action"], "'Progress' changed (0 -> 75)");

    // The inspection history namespace stays empty for this id.
    let response = app
        .request(
            Method::GET,
            &format!("/api/histories/inspection/{}", id),
            None,
            Some(&token),
        )
        .await;
    let histories = response_json(response).await;
    assert_eq!(histories.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn non_owner_update_forbidden() {
    let app = TestApp::new().await;
    let alice = app.login("alice", "pw123").await;
    let bob = app.login("bob", "pw456").await;
    let id = create_item(&app, &alice).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/quality-improvements/{}", id),
            Some(json!({ "progress": 100 })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_can_delete() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;
    let id = create_item(&app, &token).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/quality-improvements/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            &format!("/api/quality-improvements/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shares_company_rows_with_inspections() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    create_item(&app, &token).await;

    let response = app
        .request(
            Method::POST,
            "/api/inspections",
            Some(json!({
                "company_name": "Acme",
                "product_name": "Widget",
                "product_code": "P1",
                "inspected_quantity": 10,
                "defective_quantity": 0,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(Method::GET, "/api/companies", None, Some(&token))
        .await;
    let companies = response_json(response).await;
    assert_eq!(companies.as_array().expect("array").len(), 1);
}
