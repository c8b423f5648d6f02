use crate::domain::models::{
    attendance::AttendanceRecord,
    auth::{IdentitySession, Principal},
    branch::Branch,
    member::{Member, MemberStatus},
    package::Package,
    payment::Payment,
    subscription::{Subscription, SubscriptionStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn create(&self, branch: &Branch) -> Result<Branch, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, AppError>;
    async fn list(&self) -> Result<Vec<Branch>, AppError>;
    async fn update(&self, branch: &Branch) -> Result<Branch, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, package: &Package) -> Result<Package, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Package>, AppError>;
    async fn list(&self) -> Result<Vec<Package>, AppError>;
    async fn update(&self, package: &Package) -> Result<Package, AppError>;
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Package, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemberListFilter {
    pub branch_id: Option<String>,
    pub status: Option<MemberStatus>,
    pub search: Option<String>,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: &Member) -> Result<Member, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, AppError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, AppError>;
    async fn list(&self, filter: &MemberListFilter) -> Result<Vec<Member>, AppError>;
    async fn update(&self, member: &Member) -> Result<Member, AppError>;
    /// Reserved for the subscription lifecycle (and its administrative
    /// deactivation path); handlers must not call this directly.
    async fn set_status(&self, id: &str, status: MemberStatus) -> Result<Member, AppError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts the new active subscription, expiring any prior active one
    /// for the member and flipping the member to `active`, in a single
    /// transaction.
    async fn create_superseding(&self, subscription: &Subscription) -> Result<Subscription, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, AppError>;
    async fn find_active_for_member(&self, member_id: &str) -> Result<Option<Subscription>, AppError>;
    async fn list(
        &self,
        member_id: Option<&str>,
        status: Option<SubscriptionStatus>,
    ) -> Result<Vec<Subscription>, AppError>;
    /// Freezes the subscription, bumps `freezes_used` and flips the
    /// member to `frozen`, in a single transaction.
    async fn set_frozen(
        &self,
        id: &str,
        freeze_start: NaiveDate,
        freeze_end: NaiveDate,
        reason: Option<String>,
    ) -> Result<Subscription, AppError>;
    /// Clears the freeze window and restores subscription and member to
    /// `active`, in a single transaction.
    async fn set_active(&self, id: &str) -> Result<Subscription, AppError>;
    /// Marks the subscription `expired` and the member `expired`, in a
    /// single transaction.
    async fn mark_expired(&self, id: &str) -> Result<Subscription, AppError>;
    /// Active subscriptions whose end date has passed, for the sweep.
    async fn find_lapsed(&self, today: NaiveDate) -> Result<Vec<Subscription>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct AttendanceListFilter {
    pub branch_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub member_id: Option<String>,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_open(&self, member_id: &str, date: NaiveDate) -> Result<Option<AttendanceRecord>, AppError>;
    /// Inserts the record and increments the member's visit counter in a
    /// single transaction; the counter moves exactly once per check-in.
    async fn insert_checkin(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn close(
        &self,
        id: &str,
        check_out: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<AttendanceRecord, AppError>;
    async fn list(&self, filter: &AttendanceListFilter) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn list_for_member(&self, member_id: &str, limit: i64) -> Result<Vec<AttendanceRecord>, AppError>;
    /// Today's open records for a branch: the "currently inside" view.
    async fn list_open_for_branch(&self, branch_id: &str, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct PaymentListFilter {
    pub branch_id: Option<String>,
    pub member_id: Option<String>,
    pub status: Option<String>,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError>;
    async fn list(&self, filter: &PaymentListFilter) -> Result<Vec<Payment>, AppError>;
}

#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Atomically increments and returns the counter for (kind, scope).
    /// Concurrent callers each observe a distinct value.
    async fn next_value(&self, kind: &str, scope: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AppError>;
    /// Fails closed: any provider error, unknown token, or metadata blob
    /// without a parsable role yields `Unauthenticated`.
    async fn validate(&self, bearer_token: &str) -> Result<Principal, AppError>;
    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AppError>;
    async fn sign_out(&self, bearer_token: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, phone: &str, body: &str) -> Result<(), AppError>;
}
