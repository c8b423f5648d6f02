use crate::domain::models::member::MemberStatus;
use crate::domain::models::subscription::SubscriptionStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub timezone: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub max_freezes: Option<i32>,
    pub freeze_days_allowed: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<i32>,
    pub price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub max_freezes: Option<i32>,
    pub freeze_days_allowed: Option<i32>,
}

#[derive(Deserialize)]
pub struct TogglePackageRequest {
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct RegisterMemberRequest {
    pub branch_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub subscription: Option<RegisterSubscriptionRequest>,
}

#[derive(Deserialize)]
pub struct RegisterSubscriptionRequest {
    pub package_id: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub branch_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMemberStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct MemberListQuery {
    pub search: Option<String>,
    pub status: Option<MemberStatus>,
    pub branch_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSubscriptionRequest {
    pub member_id: String,
    pub package_id: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct SubscriptionListQuery {
    pub member_id: Option<String>,
    pub status: Option<SubscriptionStatus>,
}

#[derive(Deserialize)]
pub struct FreezeSubscriptionRequest {
    pub freeze_start: NaiveDate,
    pub freeze_end: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckinRequest {
    pub identifier: String,
    pub branch_id: String,
}

#[derive(Deserialize)]
pub struct AttendanceListQuery {
    pub branch_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub member_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TodayAttendanceQuery {
    pub branch_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub member_id: String,
    pub branch_id: Option<String>,
    pub subscription_id: Option<String>,
    pub amount: f64,
    pub method: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct PaymentListQuery {
    pub branch_id: Option<String>,
    pub member_id: Option<String>,
    pub status: Option<String>,
}
