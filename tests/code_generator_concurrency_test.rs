mod common;

use common::{create_branch, create_package, parse_body, TestApp};
use gym_backend::domain::services::codes::CodeKind;
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use tokio::task::JoinSet;

#[tokio::test]
async fn concurrent_generator_calls_never_repeat_a_code() {
    let app = TestApp::new().await;
    let total = 50;

    let mut set = JoinSet::new();
    for _ in 0..total {
        let codes = app.state.codes.clone();
        set.spawn(async move {
            codes.next(CodeKind::Member, Utc::now()).await.expect("code generation failed")
        });
    }

    let mut issued = Vec::new();
    while let Some(res) = set.join_next().await {
        issued.push(res.unwrap());
    }

    let unique: HashSet<String> = issued.iter().cloned().collect();
    assert_eq!(
        unique.len(),
        issued.len(),
        "Duplicate codes issued under concurrency: {:?}",
        issued
    );
    assert_eq!(issued.len(), total);
}

#[tokio::test]
async fn simultaneous_registrations_commit_distinct_member_codes() {
    let app = TestApp::new().await;
    let branch_id = create_branch(&app, "Downtown").await;
    let package_id = create_package(&app, "Monthly", json!({})).await;

    let total = 20;
    let mut set = JoinSet::new();
    for i in 0..total {
        let router = app.router.clone();
        let branch_id = branch_id.clone();
        let package_id = package_id.clone();
        set.spawn(async move {
            use axum::{body::Body, http::{header, Request}};
            use tower::ServiceExt;

            let payload = json!({
                "branch_id": branch_id,
                "name": format!("Member {}", i),
                "phone": format!("91000000{:02}", i),
                "subscription": { "package_id": package_id }
            });
            let res = router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/members")
                    .header(header::AUTHORIZATION, "Bearer owner-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap()
            ).await.unwrap();

            assert!(res.status().is_success(), "registration failed: {}", res.status());
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            value["member"]["code"].as_str().unwrap().to_string()
        });
    }

    let mut codes = Vec::new();
    while let Some(res) = set.join_next().await {
        codes.push(res.unwrap());
    }

    let unique: HashSet<String> = codes.iter().cloned().collect();
    assert_eq!(unique.len(), total, "Duplicate member codes committed: {:?}", codes);

    // every committed code is also unique in the store
    let res = app.req("GET", "/api/v1/members", Some("admin-token"), None).await;
    let members = parse_body(res).await;
    assert_eq!(members.as_array().unwrap().len(), total);
}
