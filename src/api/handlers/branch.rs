use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateBranchRequest, UpdateBranchRequest};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::auth::Role;
use crate::domain::models::branch::{Branch, NewBranchParams};
use crate::domain::services::codes::{CodeKind, MAX_CODE_ATTEMPTS};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let branches = state.branch_repo.list().await?;
    Ok(Json(branches))
}

pub async fn get_branch(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let branch = state.branch_repo.find_by_id(&branch_id).await?
        .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;
    Ok(Json(branch))
}

pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner, Role::Admin])?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Branch name is required".into()));
    }

    let mut attempts = 0;
    let created = loop {
        let code = state.codes.next(CodeKind::Branch, Utc::now()).await?;
        let branch = Branch::new(NewBranchParams {
            code,
            name: payload.name.clone(),
            timezone: payload.timezone.clone(),
            capacity: payload.capacity.unwrap_or(0),
        });

        match state.branch_repo.create(&branch).await {
            Ok(created) => break created,
            Err(e) if e.is_unique_violation() => {
                attempts += 1;
                if attempts >= MAX_CODE_ATTEMPTS {
                    return Err(AppError::IdentifierConflict(
                        "Could not allocate a unique branch code".into(),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    };

    info!("Created branch {} ({})", created.id, created.code);
    Ok(Json(created))
}

pub async fn update_branch(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(branch_id): Path<String>,
    Json(payload): Json<UpdateBranchRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner, Role::Admin])?;

    let mut branch = state.branch_repo.find_by_id(&branch_id).await?
        .ok_or_else(|| AppError::NotFound("Branch not found".into()))?;

    if let Some(name) = payload.name { branch.name = name; }
    if let Some(timezone) = payload.timezone { branch.timezone = timezone; }
    if let Some(capacity) = payload.capacity { branch.capacity = capacity; }
    if let Some(is_active) = payload.is_active { branch.is_active = is_active; }

    let updated = state.branch_repo.update(&branch).await?;
    Ok(Json(updated))
}

pub async fn delete_branch(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner])?;

    state.branch_repo.delete(&branch_id).await?;
    info!("Deleted branch {}", branch_id);
    Ok(Json(json!({ "message": "Branch deleted" })))
}
