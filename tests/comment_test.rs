//! Comments on polymorphic parents: parent-type validation, ordering and
//! author-only edit/delete.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::json;

async fn create_inspection(app: &TestApp, token: &str) -> i64 {
    let response = app
        .request(
            Method::POST,
            "/api/inspections",
            Some(json!({
                "company_name": "Acme",
                "product_name": "Widget",
                "product_code": "P1",
                "inspected_quantity": 100,
                "defective_quantity": 5,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"].as_i64().unwrap()
}

async fn add_comment(app: &TestApp, token: &str, parent_id: i64, content: &str) -> i64 {
    let response = app
        .request(
            Method::POST,
            "/api/comments",
            Some(json!({
                "parent_type": "inspection",
                "parent_id": parent_id,
                "content": content,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn comments_list_oldest_first_with_author() {
    let app = TestApp::new().await;
    let alice = app.login("alice", "pw123").await;
    let bob = app.login("bob", "pw456").await;
    let id = create_inspection(&app, &alice).await;

    add_comment(&app, &alice, id, "first note").await;
    add_comment(&app, &bob, id, "second note").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/comments/inspection/{}", id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rows = response_json(response).await;
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["content"], "first note");
    assert_eq!(rows[0]["username"], "alice");
    assert_eq!(rows[1]["content"], "second note");
    assert_eq!(rows[1]["username"], "bob");
}

#[tokio::test]
async fn unknown_parent_type_rejected() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    let response = app
        .request(
            Method::POST,
            "/api/comments",
            Some(json!({
                "parent_type": "order",
                "parent_id": 1,
                "content": "hello",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/comments/order/1", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_content_rejected() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    let response = app
        .request(
            Method::POST,
            "/api/comments",
            Some(json!({
                "parent_type": "inspection",
                "parent_id": 1,
                "content": "",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn parent_existence_is_not_checked() {
    let app = TestApp::new().await;
    let token = app.login("alice", "pw123").await;

    // No inspection 999 exists; the comment is still accepted.
    let response = app
        .request(
            Method::POST,
            "/api/comments",
            Some(json!({
                "parent_type": "inspection",
                "parent_id": 999,
                "content": "orphaned note",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn author_can_edit_others_cannot() {
    let app = TestApp::new().await;
    let alice = app.login("alice", "pw123").await;
    let bob = app.login("bob", "pw456").await;
    let id = create_inspection(&app, &alice).await;
    let comment_id = add_comment(&app, &alice, id, "draft").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/comments/{}", comment_id),
            Some(json!({ "content": "revised" })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/comments/{}", comment_id),
            Some(json!({ "content": "revised" })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            &format!("/api/comments/inspection/{}", id),
            None,
            Some(&alice),
        )
        .await;
    let rows = response_json(response).await;
    assert_eq!(rows.as_array().expect("array")[0]["content"], "revised");
}

#[tokio::test]
async fn author_can_delete_others_cannot() {
    let app = TestApp::new().await;
    let alice = app.login("alice", "pw123").await;
    let bob = app.login("bob", "pw456").await;
    let id = create_inspection(&app, &alice).await;
    let comment_id = add_comment(&app, &alice, id, "to be removed").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
