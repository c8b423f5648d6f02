use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Freeze window too long: {0}")]
    FreezeExceeded(String),
    #[error("Freeze quota exhausted: {0}")]
    FreezeQuotaExhausted(String),
    #[error("Member not active: {0}")]
    MemberNotActive(String),
    #[error("Identifier conflict: {0}")]
    IdentifierConflict(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// True when the underlying store rejected a duplicate key.
    /// 2067 = SQLite unique constraint, 23505 = Postgres unique violation.
    pub fn is_unique_violation(&self) -> bool {
        if let AppError::Database(e) = self {
            if let Some(db_err) = e.as_database_error() {
                let code = db_err.code().unwrap_or_default();
                return code == "2067" || code == "23505";
            }
        }
        false
    }

    /// True for store errors worth retrying on read-only paths
    /// (connection drops, pool timeouts). Mutations never retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Database(sqlx::Error::Io(_)) | AppError::Database(sqlx::Error::PoolTimedOut)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::FreezeExceeded(_) => "freeze_exceeded",
            AppError::FreezeQuotaExhausted(_) => "freeze_quota_exhausted",
            AppError::MemberNotActive(_) => "member_not_active",
            AppError::IdentifierConflict(_) => "identifier_conflict",
            AppError::Upstream(_) => "upstream",
            AppError::Internal | AppError::InternalWithMsg(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if self.is_unique_violation() {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({
                            "kind": "conflict",
                            "error": "Resource already exists (duplicate entry)"
                        })),
                    )
                        .into_response();
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::FreezeExceeded(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::FreezeQuotaExhausted(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::MemberNotActive(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::IdentifierConflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Upstream(msg) => {
                error!("Upstream service error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream service unavailable".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "kind": self.kind(),
            "error": message
        }));

        (status, body).into_response()
    }
}
