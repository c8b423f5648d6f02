mod common;

use axum::http::StatusCode;
use common::{create_branch, create_package, parse_body, register_member, TestApp};
use serde_json::{json, Value};

async fn active_subscriptions(app: &TestApp, member_id: &str) -> Vec<Value> {
    let res = app.req(
        "GET",
        &format!("/api/v1/subscriptions?member_id={}&status=active", member_id),
        Some("admin-token"),
        None,
    ).await;
    parse_body(res).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn renewal_supersedes_prior_active_subscription() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (member, first_sub) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let member_id = member["id"].as_str().unwrap();

    let res = app.req(
        "POST", "/api/v1/subscriptions", Some("owner-token"),
        Some(json!({ "member_id": member_id, "package_id": package_id })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second_sub = parse_body(res).await;
    assert_eq!(second_sub["status"], "active");
    assert_ne!(second_sub["id"], first_sub["id"]);

    // the old plan was expired, not queued: exactly one active remains
    let active = active_subscriptions(&app, member_id).await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second_sub["id"]);

    let res = app.req(
        "GET", &format!("/api/v1/subscriptions?member_id={}", member_id),
        Some("admin-token"), None,
    ).await;
    let all = parse_body(res).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn freeze_and_unfreeze_toggle_member_status() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (member, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let member_id = member["id"].as_str().unwrap();
    let subscription_id = subscription["id"].as_str().unwrap();

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"),
        Some(json!({ "freeze_start": "2030-02-01", "freeze_end": "2030-02-10", "reason": "travel" })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let frozen = parse_body(res).await;
    assert_eq!(frozen["status"], "frozen");
    assert_eq!(frozen["freeze_reason"], "travel");
    assert_eq!(frozen["freezes_used"], 1);

    let res = app.req("GET", &format!("/api/v1/members/{}", member_id), Some("admin-token"), None).await;
    assert_eq!(parse_body(res).await["member"]["status"], "frozen");

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/unfreeze", subscription_id),
        Some("owner-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let active = parse_body(res).await;
    assert_eq!(active["status"], "active");
    assert!(active["freeze_start"].is_null());
    assert!(active["freeze_end"].is_null());
    // end_date is untouched by the freeze/unfreeze round trip
    assert_eq!(active["end_date"], subscription["end_date"]);

    let res = app.req("GET", &format!("/api/v1/members/{}", member_id), Some("admin-token"), None).await;
    assert_eq!(parse_body(res).await["member"]["status"], "active");
}

#[tokio::test]
async fn freeze_with_empty_window_is_rejected_unchanged() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (member, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let subscription_id = subscription["id"].as_str().unwrap();

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"),
        Some(json!({ "freeze_start": "2030-02-01", "freeze_end": "2030-02-01" })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["kind"], "validation");

    // subscription and member state are untouched
    let active = active_subscriptions(&app, member["id"].as_str().unwrap()).await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["freezes_used"], 0);
}

#[tokio::test]
async fn freeze_span_over_allowance_is_rejected() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({ "freeze_days_allowed": 7 })).await;
    let (member, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let subscription_id = subscription["id"].as_str().unwrap();

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"),
        Some(json!({ "freeze_start": "2030-02-01", "freeze_end": "2030-02-15" })),
    ).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse_body(res).await["kind"], "freeze_exceeded");

    let active = active_subscriptions(&app, member["id"].as_str().unwrap()).await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["status"], "active");
}

#[tokio::test]
async fn freeze_quota_is_enforced_across_the_lifetime() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({ "max_freezes": 1 })).await;
    let (_, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let subscription_id = subscription["id"].as_str().unwrap();

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"),
        Some(json!({ "freeze_start": "2030-02-01", "freeze_end": "2030-02-05" })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/unfreeze", subscription_id),
        Some("owner-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"),
        Some(json!({ "freeze_start": "2030-03-01", "freeze_end": "2030-03-05" })),
    ).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse_body(res).await["kind"], "freeze_quota_exhausted");
}

#[tokio::test]
async fn freezing_a_non_active_subscription_is_an_invalid_transition() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (_, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let subscription_id = subscription["id"].as_str().unwrap();

    let freeze = json!({ "freeze_start": "2030-02-01", "freeze_end": "2030-02-05" });
    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"), Some(freeze.clone()),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    // already frozen
    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/freeze", subscription_id),
        Some("owner-token"), Some(freeze),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "invalid_transition");
}

#[tokio::test]
async fn at_most_one_active_subscription_survives_mixed_transitions() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({ "max_freezes": 10 })).await;
    let (member, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;
    let member_id = member["id"].as_str().unwrap().to_string();
    let mut current_sub = subscription["id"].as_str().unwrap().to_string();

    // a scripted walk over the state machine, invalid moves included;
    // the invariant must hold after every step regardless of outcome
    let steps = [
        "freeze", "freeze", "unfreeze", "renew", "unfreeze", "freeze",
        "renew", "renew", "freeze", "unfreeze", "renew",
    ];

    for (i, step) in steps.iter().enumerate() {
        match *step {
            "renew" => {
                let res = app.req(
                    "POST", "/api/v1/subscriptions", Some("owner-token"),
                    Some(json!({ "member_id": member_id, "package_id": package_id })),
                ).await;
                if res.status().is_success() {
                    current_sub = parse_body(res).await["id"].as_str().unwrap().to_string();
                }
            }
            "freeze" => {
                let start = format!("2030-{:02}-01", i + 1);
                let end = format!("2030-{:02}-05", i + 1);
                app.req(
                    "PATCH", &format!("/api/v1/subscriptions/{}/freeze", current_sub),
                    Some("owner-token"),
                    Some(json!({ "freeze_start": start, "freeze_end": end })),
                ).await;
            }
            "unfreeze" => {
                app.req(
                    "PATCH", &format!("/api/v1/subscriptions/{}/unfreeze", current_sub),
                    Some("owner-token"), None,
                ).await;
            }
            _ => unreachable!(),
        }

        let active = active_subscriptions(&app, &member_id).await;
        assert!(
            active.len() <= 1,
            "step {} ({}) left {} active subscriptions",
            i, step, active.len()
        );
    }
}

#[tokio::test]
async fn unfreezing_an_active_subscription_is_an_invalid_transition() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;
    let (_, subscription) = register_member(&app, &branch_id, Some(&package_id), "Alice", "9000000001").await;

    let res = app.req(
        "PATCH", &format!("/api/v1/subscriptions/{}/unfreeze", subscription["id"].as_str().unwrap()),
        Some("owner-token"), None,
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "invalid_transition");
}
