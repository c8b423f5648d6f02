use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::domain::models::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

/// Resolves the bearer credential through the identity provider. Every
/// failure — missing header, unknown token, provider outage — rejects
/// with `Unauthenticated` before any handler logic runs.
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing or invalid authorization header".to_string()))?;

        let token = header_value.strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthenticated("Missing or invalid authorization header".to_string()))?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let principal = app_state.identity.validate(token).await?;

        Span::current().record("principal_id", principal.id.as_str());
        Span::current().record("role", principal.role.as_str());
        if let Some(branch_id) = &principal.branch_id {
            Span::current().record("branch_id", branch_id.as_str());
        }

        Ok(AuthPrincipal(principal))
    }
}
