use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateSubscriptionRequest, FreezeSubscriptionRequest, SubscriptionListQuery};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::auth::{Principal, Role};
use crate::domain::models::member::Member;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

const SUBSCRIPTION_ROLES: &[Role] = &[Role::Owner, Role::Admin, Role::FrontDesk];

async fn scoped_member(
    state: &Arc<AppState>,
    principal: &Principal,
    member_id: &str,
) -> Result<Member, AppError> {
    let member = state.member_repo.find_by_id(member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
    principal.scoped_branch(Some(member.branch_id.clone()))?;
    Ok(member)
}

pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;

    // Subscriptions are reached through their member; scoped roles must
    // name one so the branch check can run.
    match &query.member_id {
        Some(member_id) => {
            scoped_member(&state, &principal, member_id).await?;
        }
        None if !principal.role.is_global() => {
            return Err(AppError::Forbidden(
                "member_id is required for branch-scoped roles".into(),
            ));
        }
        None => {}
    }

    let subscriptions = state
        .subscription_repo
        .list(query.member_id.as_deref(), query.status)
        .await?;
    Ok(Json(subscriptions))
}

/// Renew or start a plan. Any prior active subscription is superseded,
/// never queued behind.
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(SUBSCRIPTION_ROLES)?;

    let member = scoped_member(&state, &principal, &payload.member_id).await?;

    let package = state.package_repo.find_by_id(&payload.package_id).await?
        .ok_or_else(|| AppError::NotFound("Package not found".into()))?;
    if !package.is_active {
        return Err(AppError::Validation("Package is not active".into()));
    }

    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let subscription = state.lifecycle.create(&member, &package, start_date).await?;

    let body = format!(
        "Hi {}, your membership has been renewed and now runs until {}.",
        member.name, subscription.end_date
    );
    if let Err(e) = state.messages.send(&member.phone, &body).await {
        warn!("Renewal message for {} not delivered: {}", member.id, e);
    }

    Ok(Json(subscription))
}

pub async fn freeze_subscription(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(subscription_id): Path<String>,
    Json(payload): Json<FreezeSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(SUBSCRIPTION_ROLES)?;

    let subscription = state.subscription_repo.find_by_id(&subscription_id).await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".into()))?;
    scoped_member(&state, &principal, &subscription.member_id).await?;

    let frozen = state
        .lifecycle
        .freeze(&subscription_id, payload.freeze_start, payload.freeze_end, payload.reason)
        .await?;
    Ok(Json(frozen))
}

pub async fn unfreeze_subscription(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(subscription_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(SUBSCRIPTION_ROLES)?;

    let subscription = state.subscription_repo.find_by_id(&subscription_id).await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".into()))?;
    scoped_member(&state, &principal, &subscription.member_id).await?;

    let active = state.lifecycle.unfreeze(&subscription_id).await?;
    Ok(Json(active))
}
