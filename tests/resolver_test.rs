//! Service-level checks of the natural-key resolver.

mod common;

use common::TestApp;
use qctrack_api::services::reference;

#[tokio::test]
async fn company_get_or_create_is_idempotent() {
    let app = TestApp::new().await;
    let db = &*app.state.db;

    let first = reference::resolve_or_create_company(db, "Acme")
        .await
        .expect("first resolve");
    let second = reference::resolve_or_create_company(db, "Acme")
        .await
        .expect("second resolve");
    assert_eq!(first, second);

    let companies = reference::list_companies(db).await.expect("list");
    assert_eq!(companies.len(), 1);
}

#[tokio::test]
async fn distinct_names_create_distinct_rows() {
    let app = TestApp::new().await;
    let db = &*app.state.db;

    let acme = reference::resolve_or_create_company(db, "Acme")
        .await
        .expect("resolve");
    let globex = reference::resolve_or_create_company(db, "Globex")
        .await
        .expect("resolve");
    assert_ne!(acme, globex);

    let companies = reference::list_companies(db).await.expect("list");
    assert_eq!(companies.len(), 2);
    // Ordered by name.
    assert_eq!(companies[0].company_name, "Acme");
    assert_eq!(companies[1].company_name, "Globex");
}

#[tokio::test]
async fn product_get_or_create_keyed_by_code() {
    let app = TestApp::new().await;
    let db = &*app.state.db;

    let first = reference::resolve_or_create_product(db, "P1", "Widget")
        .await
        .expect("first resolve");
    // Same code with a different display name resolves to the existing row.
    let second = reference::resolve_or_create_product(db, "P1", "Widget Mk2")
        .await
        .expect("second resolve");
    assert_eq!(first, second);

    let third = reference::resolve_or_create_product(db, "P2", "Widget")
        .await
        .expect("third resolve");
    assert_ne!(first, third);
}
