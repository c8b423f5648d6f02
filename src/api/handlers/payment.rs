use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreatePaymentRequest, PaymentListQuery};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::auth::Role;
use crate::domain::models::payment::{NewPaymentParams, Payment};
use crate::domain::ports::PaymentListFilter;
use crate::domain::services::codes::{CodeKind, MAX_CODE_ATTEMPTS};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const PAYMENT_ROLES: &[Role] = &[Role::Owner, Role::Admin, Role::FrontDesk];

pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_role(PAYMENT_ROLES)?;

    if payload.amount < 0.0 {
        return Err(AppError::Validation("amount must not be negative".into()));
    }

    let member = state.member_repo.find_by_id(&payload.member_id).await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))?;

    let branch_id = payload.branch_id.unwrap_or_else(|| member.branch_id.clone());
    principal.scoped_branch(Some(branch_id.clone()))?;

    let now = Utc::now();
    let mut attempts = 0;
    let created = loop {
        let invoice_number = state.codes.next(CodeKind::Invoice, now).await?;
        let payment = Payment::new(NewPaymentParams {
            member_id: member.id.clone(),
            branch_id: branch_id.clone(),
            subscription_id: payload.subscription_id.clone(),
            invoice_number,
            amount: payload.amount,
            method: payload.method.clone(),
            paid_at: payload.paid_at,
        });

        match state.payment_repo.create(&payment).await {
            Ok(created) => break created,
            Err(e) if e.is_unique_violation() => {
                attempts += 1;
                if attempts >= MAX_CODE_ATTEMPTS {
                    return Err(AppError::IdentifierConflict(
                        "Could not allocate a unique invoice number".into(),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    };

    info!("Recorded payment {} ({})", created.id, created.invoice_number);
    Ok(Json(created))
}

pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<PaymentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_staff()?;
    let branch_id = principal.scoped_branch(query.branch_id)?;

    let filter = PaymentListFilter {
        branch_id,
        member_id: query.member_id,
        status: query.status,
    };
    let payments = state.payment_repo.list(&filter).await?;
    Ok(Json(payments))
}
