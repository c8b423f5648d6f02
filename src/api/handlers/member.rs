use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{
    MemberListQuery, RegisterMemberRequest, UpdateMemberRequest, UpdateMemberStatusRequest,
};
use crate::api::dtos::responses::MemberWithPlan;
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::auth::Role;
use crate::domain::models::member::{Member, MemberStatus, NewMemberParams};
use crate::domain::models::subscription::SubscriptionStatus;
use crate::domain::ports::MemberListFilter;
use crate::domain::services::codes::{CodeKind, MAX_CODE_ATTEMPTS};
use crate::domain::services::lifecycle::days_remaining;
use crate::error::AppError;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const REGISTRATION_ROLES: &[Role] = &[Role::Owner, Role::Admin, Role::FrontDesk];

/// Projects a member row with its reconciled active subscription. A
/// subscription that lapses is expired here, on read, so days-remaining
/// and status never disagree.
async fn with_plan(
    state: &Arc<AppState>,
    mut member: Member,
    now: DateTime<Utc>,
) -> Result<MemberWithPlan, AppError> {
    let active = state.subscription_repo.find_active_for_member(&member.id).await?;

    let (active_subscription, days) = match active {
        Some(subscription) => {
            let subscription = state.lifecycle.reconcile(subscription, now).await?;
            if subscription.status == SubscriptionStatus::Expired {
                if member.status == MemberStatus::Active {
                    member.status = MemberStatus::Expired;
                }
                (None, 0)
            } else {
                let days = days_remaining(subscription.end_date, now);
                (Some(subscription), days)
            }
        }
        None => (None, 0),
    };

    let package_name = match &active_subscription {
        Some(subscription) => state
            .package_repo
            .find_by_id(&subscription.package_id)
            .await?
            .map(|p| p.name),
        None => None,
    };

    Ok(MemberWithPlan { member, days_remaining: days, package_name, active_subscription })
}

pub async fn register_member(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<RegisterMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(REGISTRATION_ROLES)?;
    principal.scoped_branch(Some(payload.branch_id.clone()))?;

    if payload.name.trim().is_empty() || payload.phone.trim().is_empty() {
        return Err(AppError::Validation("name and phone are required".into()));
    }

    state.branch_repo.find_by_id(&payload.branch_id).await?
        .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;

    // Resolve the package up front so a bad reference never leaves a
    // half-registered member behind.
    let package = match &payload.subscription {
        Some(subscription) => {
            let package = state.package_repo.find_by_id(&subscription.package_id).await?
                .ok_or_else(|| AppError::NotFound("Package not found".into()))?;
            if !package.is_active {
                return Err(AppError::Validation("Package is not active".into()));
            }
            Some(package)
        }
        None => None,
    };

    let now = Utc::now();
    let joining_date = payload.joining_date.unwrap_or_else(|| now.date_naive());

    let mut attempts = 0;
    let member = loop {
        let code = state.codes.next(CodeKind::Member, now).await?;
        let candidate = Member::new(NewMemberParams {
            branch_id: payload.branch_id.clone(),
            code,
            name: payload.name.clone(),
            phone: payload.phone.clone(),
            email: payload.email.clone(),
            joining_date,
        });

        match state.member_repo.create(&candidate).await {
            Ok(member) => break member,
            Err(e) if e.is_unique_violation() => {
                attempts += 1;
                if attempts >= MAX_CODE_ATTEMPTS {
                    return Err(AppError::IdentifierConflict(
                        "Could not allocate a unique member code".into(),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    };

    info!("Registered member {} ({})", member.id, member.code);

    let subscription = match (payload.subscription, package) {
        (Some(request), Some(package)) => {
            let start_date = request.start_date.unwrap_or_else(|| now.date_naive());
            let subscription = state.lifecycle.create(&member, &package, start_date).await?;

            let body = format!(
                "Welcome to the gym, {}! Your membership {} runs until {}.",
                member.name, member.code, subscription.end_date
            );
            if let Err(e) = state.messages.send(&member.phone, &body).await {
                warn!("Welcome message for {} not delivered: {}", member.id, e);
            }

            Some(subscription)
        }
        _ => None,
    };

    // lifecycle.create flipped the status; return what the store holds
    let member = state.member_repo.find_by_id(&member.id).await?
        .ok_or(AppError::Internal)?;

    Ok(Json(json!({
        "member": member,
        "subscription": subscription
    })))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<MemberListQuery>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let branch_id = principal.scoped_branch(query.branch_id)?;

    let filter = MemberListFilter {
        branch_id,
        status: query.status,
        search: query.search,
    };

    let now = Utc::now();
    let members = state.member_repo.list(&filter).await?;
    let mut enriched = Vec::with_capacity(members.len());
    for member in members {
        enriched.push(with_plan(&state, member, now).await?);
    }

    Ok(Json(enriched))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;

    let member = state.member_repo.find_by_id(&member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
    principal.scoped_branch(Some(member.branch_id.clone()))?;

    let subscriptions = state.subscription_repo.list(Some(&member.id), None).await?;
    let attendance = state.attendance_repo.list_for_member(&member.id, 100).await?;
    let projected = with_plan(&state, member, Utc::now()).await?;

    Ok(Json(json!({
        "member": projected,
        "subscriptions": subscriptions,
        "attendance_records": attendance
    })))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(member_id): Path<String>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(REGISTRATION_ROLES)?;

    let mut member = state.member_repo.find_by_id(&member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
    principal.scoped_branch(Some(member.branch_id.clone()))?;

    if let Some(branch_id) = payload.branch_id {
        // transfers must land inside the caller's scope as well
        principal.scoped_branch(Some(branch_id.clone()))?;
        state.branch_repo.find_by_id(&branch_id).await?
            .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;
        member.branch_id = branch_id;
    }
    if let Some(name) = payload.name { member.name = name; }
    if let Some(phone) = payload.phone { member.phone = phone; }
    if let Some(email) = payload.email { member.email = Some(email); }

    let updated = state.member_repo.update(&member).await?;
    Ok(Json(updated))
}

pub async fn update_member_status(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(member_id): Path<String>,
    Json(payload): Json<UpdateMemberStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(REGISTRATION_ROLES)?;

    let member = state.member_repo.find_by_id(&member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
    principal.scoped_branch(Some(member.branch_id.clone()))?;

    // Member status mirrors the subscription state machine; the only
    // direct write a client may request is the inactive override.
    if payload.status != "inactive" {
        return Err(AppError::Validation(
            "Member status is derived from the subscription; only 'inactive' may be set directly".into(),
        ));
    }

    let member = state.lifecycle.deactivate(&member.id).await?;
    Ok(Json(member))
}

pub async fn member_attendance(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;

    let member = state.member_repo.find_by_id(&member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
    principal.scoped_branch(Some(member.branch_id.clone()))?;

    let records = state.attendance_repo.list_for_member(&member.id, 100).await?;
    Ok(Json(records))
}
