mod common;

use axum::http::StatusCode;
use common::{create_branch, create_package, parse_body, register_member, TestApp};
use serde_json::json;

#[tokio::test]
async fn payments_get_sequential_invoice_numbers() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (member, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;

    let res = app.req(
        "POST", "/api/v1/payments", Some("owner-token"),
        Some(json!({
            "member_id": member["id"],
            "subscription_id": subscription["id"],
            "amount": 1500.0,
            "method": "cash"
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = parse_body(res).await;
    let invoice = first["invoice_number"].as_str().unwrap();
    assert!(invoice.starts_with("INV-"), "unexpected invoice {}", invoice);
    assert!(invoice.ends_with("-00001"));
    assert_eq!(first["status"], "completed");
    // the branch defaults to the member's branch
    assert_eq!(first["branch_id"], member["branch_id"]);

    let res = app.req(
        "POST", "/api/v1/payments", Some("owner-token"),
        Some(json!({ "member_id": member["id"], "amount": 500.0, "method": "card" })),
    ).await;
    let second = parse_body(res).await;
    assert!(second["invoice_number"].as_str().unwrap().ends_with("-00002"));
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let (member, _) = register_member(&app, &branch_id, None, "Bob", "9000000002").await;

    let res = app.req(
        "POST", "/api/v1/payments", Some("owner-token"),
        Some(json!({ "member_id": member["id"], "amount": -5.0, "method": "cash" })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_listing_filters_by_member() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let (alice, _) = register_member(&app, &branch_id, None, "Alice", "9000000001").await;
    let (bob, _) = register_member(&app, &branch_id, None, "Bob", "9000000002").await;

    for member in [&alice, &bob] {
        app.req(
            "POST", "/api/v1/payments", Some("owner-token"),
            Some(json!({ "member_id": member["id"], "amount": 100.0, "method": "cash" })),
        ).await;
    }

    let res = app.req(
        "GET", &format!("/api/v1/payments?member_id={}", alice["id"].as_str().unwrap()),
        Some("admin-token"), None,
    ).await;
    let payments = parse_body(res).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["member_id"], alice["id"]);
}
