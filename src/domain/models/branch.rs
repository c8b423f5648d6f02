use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Branch {
    pub id: String,
    pub code: String,
    pub name: String,
    pub timezone: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewBranchParams {
    pub code: String,
    pub name: String,
    pub timezone: Option<String>,
    pub capacity: i32,
}

impl Branch {
    pub fn new(params: NewBranchParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: params.code,
            name: params.name,
            timezone: params.timezone.unwrap_or_else(|| "UTC".to_string()),
            capacity: params.capacity,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Branch-local timezone, falling back to UTC on an unparsable name.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
