use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{AttendanceListQuery, CheckinRequest, TodayAttendanceQuery};
use crate::api::dtos::responses::ToggleResponse;
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::ports::AttendanceListFilter;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;

/// The front-door toggle: the same identifier presented twice in a row
/// checks the member in, then out.
pub async fn check_in_or_out(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CheckinRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;

    if payload.identifier.trim().is_empty() {
        return Err(AppError::Validation("identifier and branch_id required".into()));
    }
    principal.scoped_branch(Some(payload.branch_id.clone()))?;

    let branch = state.branch_repo.find_by_id(&payload.branch_id).await?
        .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;

    let member = state.attendance.resolve_member(&payload.identifier).await?;
    let outcome = state.attendance.toggle(&member, &branch, Utc::now()).await?;

    // total_visits may have moved inside the toggle
    let member = state.member_repo.find_by_id(&member.id).await?
        .ok_or(AppError::Internal)?;

    Ok(Json(ToggleResponse {
        action: outcome.action,
        record: outcome.record,
        member,
    }))
}

pub async fn list_attendance(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<AttendanceListQuery>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let branch_id = principal.scoped_branch(query.branch_id)?;

    let filter = AttendanceListFilter {
        branch_id,
        date: query.date,
        member_id: query.member_id,
    };
    let records = state.attendance_repo.list(&filter).await?;
    Ok(Json(records))
}

/// Who is inside right now: today's open records for a branch.
pub async fn today_attendance(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<TodayAttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;

    let branch_id = principal.scoped_branch(query.branch_id)?
        .ok_or_else(|| AppError::Validation("branch_id is required".into()))?;

    let branch = state.branch_repo.find_by_id(&branch_id).await?
        .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;

    let today = Utc::now().with_timezone(&branch.tz()).date_naive();
    let records = state.attendance_repo.list_open_for_branch(&branch.id, today).await?;
    Ok(Json(records))
}
