use axum::{extract::State, http::header, http::HeaderMap, response::IntoResponse, Json};
use crate::api::dtos::requests::{LoginRequest, RefreshRequest};
use crate::api::extractors::auth::AuthPrincipal;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }

    // A member code works as a login name; resolve it to the member's
    // email before handing off to the identity provider.
    let email = if payload.email.starts_with("FIT-") {
        let member = state.member_repo.find_by_code(&payload.email).await?;
        match member.and_then(|m| m.email) {
            Some(email) => email,
            None => {
                return Err(AppError::Unauthenticated(
                    "Member ID not found or no email associated".into(),
                ))
            }
        }
    } else {
        payload.email
    };

    let session = state.identity.sign_in(&email, &payload.password).await?;
    info!("Login successful for principal {}", session.principal.id);

    Ok(Json(json!({
        "token": session.access_token,
        "refresh_token": session.refresh_token,
        "user": session.principal
    })))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.identity.refresh(&payload.refresh_token).await?;

    Ok(Json(json!({
        "token": session.access_token,
        "refresh_token": session.refresh_token
    })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    _principal: AuthPrincipal,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthenticated("Missing or invalid authorization header".into()))?;

    state.identity.sign_out(token).await?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(AuthPrincipal(principal): AuthPrincipal) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({ "user": principal })))
}
