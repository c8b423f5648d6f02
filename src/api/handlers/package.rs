use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreatePackageRequest, TogglePackageRequest, UpdatePackageRequest};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::auth::Role;
use crate::domain::models::package::{NewPackageParams, Package};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_packages(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let packages = state.package_repo.list().await?;
    Ok(Json(packages))
}

pub async fn get_package(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(package_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let package = state.package_repo.find_by_id(&package_id).await?
        .ok_or_else(|| AppError::NotFound("Package not found".into()))?;
    Ok(Json(package))
}

pub async fn create_package(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner, Role::Admin])?;

    if payload.duration_days <= 0 {
        return Err(AppError::Validation("duration_days must be positive".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }

    let package = Package::new(NewPackageParams {
        name: payload.name,
        description: payload.description,
        duration_days: payload.duration_days,
        price: payload.price,
        discounted_price: payload.discounted_price,
        max_freezes: payload.max_freezes.unwrap_or(0),
        freeze_days_allowed: payload.freeze_days_allowed.unwrap_or(0),
    });

    let created = state.package_repo.create(&package).await?;
    info!("Created package {}", created.id);
    Ok(Json(created))
}

pub async fn update_package(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(package_id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner, Role::Admin])?;

    let mut package = state.package_repo.find_by_id(&package_id).await?
        .ok_or_else(|| AppError::NotFound("Package not found".into()))?;

    if let Some(name) = payload.name { package.name = name; }
    if let Some(description) = payload.description { package.description = Some(description); }
    if let Some(duration_days) = payload.duration_days {
        if duration_days <= 0 {
            return Err(AppError::Validation("duration_days must be positive".into()));
        }
        package.duration_days = duration_days;
    }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        package.price = price;
    }
    if let Some(discounted_price) = payload.discounted_price { package.discounted_price = Some(discounted_price); }
    if let Some(max_freezes) = payload.max_freezes { package.max_freezes = max_freezes; }
    if let Some(freeze_days_allowed) = payload.freeze_days_allowed { package.freeze_days_allowed = freeze_days_allowed; }

    // Existing subscriptions are untouched: end dates were fixed at
    // subscription creation.
    let updated = state.package_repo.update(&package).await?;
    Ok(Json(updated))
}

pub async fn toggle_package(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(package_id): Path<String>,
    Json(payload): Json<TogglePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner, Role::Admin])?;
    let updated = state.package_repo.set_active(&package_id, payload.is_active).await?;
    Ok(Json(updated))
}

pub async fn delete_package(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(package_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(&[Role::Owner])?;
    state.package_repo.delete(&package_id).await?;
    info!("Deleted package {}", package_id);
    Ok(Json(json!({ "message": "Package deleted" })))
}
