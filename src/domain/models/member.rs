use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Expired,
    Frozen,
    Inactive,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberStatus::Active => "active",
            MemberStatus::Expired => "expired",
            MemberStatus::Frozen => "frozen",
            MemberStatus::Inactive => "inactive",
        };
        f.write_str(s)
    }
}

/// `status` mirrors the member's current subscription state. It is
/// written by the subscription lifecycle only; the sole exception is the
/// administrative override to `inactive`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Member {
    pub id: String,
    pub branch_id: String,
    pub code: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub status: MemberStatus,
    pub joining_date: NaiveDate,
    pub total_visits: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewMemberParams {
    pub branch_id: String,
    pub code: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub joining_date: NaiveDate,
}

impl Member {
    pub fn new(params: NewMemberParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            branch_id: params.branch_id,
            code: params.code,
            name: params.name,
            phone: params.phone,
            email: params.email,
            status: MemberStatus::Inactive,
            joining_date: params.joining_date,
            total_visits: 0,
            created_at: Utc::now(),
        }
    }
}
