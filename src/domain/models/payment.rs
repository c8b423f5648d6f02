use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: String,
    pub member_id: String,
    pub branch_id: String,
    pub subscription_id: Option<String>,
    pub invoice_number: String,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewPaymentParams {
    pub member_id: String,
    pub branch_id: String,
    pub subscription_id: Option<String>,
    pub invoice_number: String,
    pub amount: f64,
    pub method: String,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn new(params: NewPaymentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            member_id: params.member_id,
            branch_id: params.branch_id,
            subscription_id: params.subscription_id,
            invoice_number: params.invoice_number,
            amount: params.amount,
            method: params.method,
            status: "completed".to_string(),
            paid_at: params.paid_at.unwrap_or_else(Utc::now),
            created_at: Utc::now(),
        }
    }
}
