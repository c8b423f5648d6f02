use axum::{
    body::Body,
    extract::Request,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{attendance, auth, branch, health, member, package, payment, subscription};
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))

        // Branches
        .route("/api/v1/branches", get(branch::list_branches).post(branch::create_branch))
        .route("/api/v1/branches/{branch_id}", get(branch::get_branch).put(branch::update_branch).delete(branch::delete_branch))

        // Packages
        .route("/api/v1/packages", get(package::list_packages).post(package::create_package))
        .route("/api/v1/packages/{package_id}", get(package::get_package).put(package::update_package).delete(package::delete_package))
        .route("/api/v1/packages/{package_id}/toggle", patch(package::toggle_package))

        // Members
        .route("/api/v1/members", get(member::list_members).post(member::register_member))
        .route("/api/v1/members/{member_id}", get(member::get_member).put(member::update_member))
        .route("/api/v1/members/{member_id}/status", patch(member::update_member_status))
        .route("/api/v1/members/{member_id}/attendance", get(member::member_attendance))

        // Subscriptions
        .route("/api/v1/subscriptions", get(subscription::list_subscriptions).post(subscription::create_subscription))
        .route("/api/v1/subscriptions/{subscription_id}/freeze", patch(subscription::freeze_subscription))
        .route("/api/v1/subscriptions/{subscription_id}/unfreeze", patch(subscription::unfreeze_subscription))

        // Attendance
        .route("/api/v1/attendance", get(attendance::list_attendance))
        .route("/api/v1/attendance/checkin", post(attendance::check_in_or_out))
        .route("/api/v1/attendance/today", get(attendance::today_attendance))

        // Payments
        .route("/api/v1/payments", get(payment::list_payments).post(payment::record_payment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        principal_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                        branch_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
