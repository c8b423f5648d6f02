use crate::config::Config;
use crate::domain::ports::{
    AttendanceRepository, BranchRepository, IdentityProvider, MemberRepository, MessageSink,
    PackageRepository, PaymentRepository, SubscriptionRepository,
};
use crate::domain::services::attendance::AttendanceEngine;
use crate::domain::services::codes::CodeGenerator;
use crate::domain::services::lifecycle::SubscriptionLifecycle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub branch_repo: Arc<dyn BranchRepository>,
    pub package_repo: Arc<dyn PackageRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub messages: Arc<dyn MessageSink>,
    pub codes: Arc<CodeGenerator>,
    pub lifecycle: Arc<SubscriptionLifecycle>,
    pub attendance: Arc<AttendanceEngine>,
}
