use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Frozen,
    Cancelled,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Frozen => "frozen",
            SubscriptionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// At most one subscription per member is `active` at any instant; the
/// superseding-create transaction in the repository upholds this.
/// `end_date` is fixed at creation and never moves, freezes included.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Subscription {
    pub id: String,
    pub member_id: String,
    pub package_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SubscriptionStatus,
    pub freeze_start: Option<NaiveDate>,
    pub freeze_end: Option<NaiveDate>,
    pub freeze_reason: Option<String>,
    pub freezes_used: i32,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(member_id: String, package_id: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            member_id,
            package_id,
            start_date,
            end_date,
            status: SubscriptionStatus::Active,
            freeze_start: None,
            freeze_end: None,
            freeze_reason: None,
            freezes_used: 0,
            created_at: Utc::now(),
        }
    }
}
