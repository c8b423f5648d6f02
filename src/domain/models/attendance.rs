use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One gym visit. Created on check-in, closed once on check-out, never
/// deleted. `date` is the calendar day in the branch's timezone; the open
/// record (check_out = NULL) is the "currently inside" slot.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AttendanceRecord {
    pub id: String,
    pub member_id: String,
    pub branch_id: String,
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn open(member_id: String, branch_id: String, date: NaiveDate, check_in: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            member_id,
            branch_id,
            date,
            check_in,
            check_out: None,
            duration_minutes: None,
            created_at: Utc::now(),
        }
    }
}
