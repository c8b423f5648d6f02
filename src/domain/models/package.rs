use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub max_freezes: i32,
    pub freeze_days_allowed: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPackageParams {
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub max_freezes: i32,
    pub freeze_days_allowed: i32,
}

impl Package {
    pub fn new(params: NewPackageParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            duration_days: params.duration_days,
            price: params.price,
            discounted_price: params.discounted_price,
            max_freezes: params.max_freezes,
            freeze_days_allowed: params.freeze_days_allowed,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
