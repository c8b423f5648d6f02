mod common;

use axum::http::StatusCode;
use common::{create_branch, create_package, parse_body, register_member, TestApp};
use gym_backend::domain::models::auth::Role;
use serde_json::json;

struct TwoBranches {
    app: TestApp,
    b1: String,
    b2: String,
    package_id: String,
}

async fn setup() -> TwoBranches {
    let app = TestApp::new().await;
    let b1 = create_branch(&app, "Downtown").await;
    let b2 = create_branch(&app, "Uptown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;

    register_member(&app, &b1, Some(&package_id), "Alice", "9000000001").await;
    register_member(&app, &b1, Some(&package_id), "Bob", "9000000002").await;
    register_member(&app, &b2, Some(&package_id), "Carol", "9000000003").await;

    app.register_scoped("desk-b1-token", Role::FrontDesk, &b1);
    app.register_scoped("coach-b1-token", Role::Coach, &b1);

    TwoBranches { app, b1, b2, package_id }
}

#[tokio::test]
async fn front_desk_sees_only_its_branch_without_asking() {
    let t = setup().await;

    // no branch filter supplied, yet only B1 members come back
    let res = t.app.req("GET", "/api/v1/members", Some("desk-b1-token"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["branch_id"].as_str().unwrap(), t.b1);
    }

    // a global role with no filter sees everything
    let res = t.app.req("GET", "/api/v1/members", Some("admin-token"), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn front_desk_cannot_reach_another_branch() {
    let t = setup().await;

    let res = t.app.req(
        "GET", &format!("/api/v1/members?branch_id={}", t.b2),
        Some("desk-b1-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // registration into the other branch is rejected before any write
    let res = t.app.req(
        "POST", "/api/v1/members", Some("desk-b1-token"),
        Some(json!({ "branch_id": t.b2, "name": "Mallory", "phone": "9000000009" })),
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // registering into its own branch is fine
    let res = t.app.req(
        "POST", "/api/v1/members", Some("desk-b1-token"),
        Some(json!({
            "branch_id": t.b1,
            "name": "Dan",
            "phone": "9000000010",
            "subscription": { "package_id": t.package_id }
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn coach_checkins_are_pinned_to_their_branch() {
    let t = setup().await;
    let (member, _) = register_member(&t.app, &t.b1, Some(&t.package_id), "Eve", "9000000011").await;

    let res = t.app.req(
        "POST", "/api/v1/attendance/checkin", Some("coach-b1-token"),
        Some(json!({ "identifier": member["code"], "branch_id": t.b2 })),
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = t.app.req(
        "POST", "/api/v1/attendance/checkin", Some("coach-b1-token"),
        Some(json!({ "identifier": member["code"], "branch_id": t.b1 })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn scoped_attendance_and_payment_lists_are_filtered() {
    let t = setup().await;
    let (b1_member, _) = register_member(&t.app, &t.b1, Some(&t.package_id), "Frank", "9000000012").await;
    let (b2_member, _) = register_member(&t.app, &t.b2, Some(&t.package_id), "Grace", "9000000013").await;

    for (member, branch) in [(&b1_member, &t.b1), (&b2_member, &t.b2)] {
        t.app.req(
            "POST", "/api/v1/attendance/checkin", Some("owner-token"),
            Some(json!({ "identifier": member["code"], "branch_id": branch })),
        ).await;
        t.app.req(
            "POST", "/api/v1/payments", Some("owner-token"),
            Some(json!({ "member_id": member["id"], "amount": 1500.0, "method": "cash" })),
        ).await;
    }

    let res = t.app.req("GET", "/api/v1/attendance", Some("desk-b1-token"), None).await;
    let records = parse_body(res).await;
    for record in records.as_array().unwrap() {
        assert_eq!(record["branch_id"].as_str().unwrap(), t.b1);
    }

    let res = t.app.req("GET", "/api/v1/payments", Some("desk-b1-token"), None).await;
    let payments = parse_body(res).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["branch_id"].as_str().unwrap(), t.b1);
}

#[tokio::test]
async fn scoped_member_detail_access_is_checked() {
    let t = setup().await;
    let (b2_member, _) = register_member(&t.app, &t.b2, Some(&t.package_id), "Heidi", "9000000014").await;
    let member_id = b2_member["id"].as_str().unwrap();

    let res = t.app.req(
        "GET", &format!("/api/v1/members/{}", member_id),
        Some("desk-b1-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = t.app.req(
        "GET", &format!("/api/v1/members/{}/attendance", member_id),
        Some("desk-b1-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
