use crate::domain::models::{
    attendance::AttendanceRecord,
    member::Member,
    subscription::Subscription,
};
use crate::domain::services::attendance::ToggleAction;
use serde::Serialize;

/// Member list/detail row enriched with the remaining-days projection of
/// the (reconciled) active subscription.
#[derive(Serialize)]
pub struct MemberWithPlan {
    #[serde(flatten)]
    pub member: Member,
    pub days_remaining: i64,
    pub package_name: Option<String>,
    pub active_subscription: Option<Subscription>,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub action: ToggleAction,
    pub record: AttendanceRecord,
    pub member: Member,
}
