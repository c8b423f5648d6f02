use crate::domain::models::{
    member::{Member, MemberStatus},
    package::Package,
    subscription::{Subscription, SubscriptionStatus},
};
use crate::domain::ports::{MemberRepository, PackageRepository, SubscriptionRepository};
use crate::domain::services::locks::MemberLocks;
use crate::error::AppError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

/// Whole days left on a subscription, never negative. A subscription
/// sitting exactly on its end date has 0 days remaining and counts as
/// expired.
pub fn days_remaining(end_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let end = end_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let secs = (end - now).num_seconds();
    if secs <= 0 {
        0
    } else {
        (secs + 86399) / 86400
    }
}

/// Freeze window rules against the package allowance. State is not
/// touched here; callers reject before any write happens.
pub fn validate_freeze_window(
    freeze_start: NaiveDate,
    freeze_end: NaiveDate,
    package: &Package,
    freezes_used: i32,
) -> Result<(), AppError> {
    let span_days = (freeze_end - freeze_start).num_days();
    if span_days <= 0 {
        return Err(AppError::Validation(
            "freeze_end must be after freeze_start".to_string(),
        ));
    }
    if span_days > package.freeze_days_allowed as i64 {
        return Err(AppError::FreezeExceeded(format!(
            "Requested freeze of {} days exceeds the package allowance of {} days",
            span_days, package.freeze_days_allowed
        )));
    }
    if freezes_used >= package.max_freezes {
        return Err(AppError::FreezeQuotaExhausted(format!(
            "All {} freezes for this package have been used",
            package.max_freezes
        )));
    }
    Ok(())
}

/// Owns every transition of a member's paid plan and is the single
/// writer of `Member.status`. All multi-step writes happen inside one
/// repository transaction; per-member ordering comes from the lock
/// registry.
pub struct SubscriptionLifecycle {
    subscriptions: Arc<dyn SubscriptionRepository>,
    members: Arc<dyn MemberRepository>,
    packages: Arc<dyn PackageRepository>,
    locks: Arc<MemberLocks>,
}

impl SubscriptionLifecycle {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        members: Arc<dyn MemberRepository>,
        packages: Arc<dyn PackageRepository>,
        locks: Arc<MemberLocks>,
    ) -> Self {
        Self { subscriptions, members, packages, locks }
    }

    /// Starts a new active subscription. Any prior active subscription
    /// for the member is expired in the same transaction: a new purchase
    /// supersedes, it does not queue.
    pub async fn create(
        &self,
        member: &Member,
        package: &Package,
        start_date: NaiveDate,
    ) -> Result<Subscription, AppError> {
        let _guard = self.locks.acquire(&member.id).await;

        let end_date = start_date + Duration::days(package.duration_days as i64);
        let subscription = Subscription::new(
            member.id.clone(),
            package.id.clone(),
            start_date,
            end_date,
        );

        let created = self.subscriptions.create_superseding(&subscription).await?;
        info!(
            member_id = %member.id,
            subscription_id = %created.id,
            end_date = %created.end_date,
            "subscription created"
        );
        Ok(created)
    }

    pub async fn freeze(
        &self,
        subscription_id: &str,
        freeze_start: NaiveDate,
        freeze_end: NaiveDate,
        reason: Option<String>,
    ) -> Result<Subscription, AppError> {
        let found = self.subscriptions.find_by_id(subscription_id).await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        let _guard = self.locks.acquire(&found.member_id).await;

        // Re-read under the lock; the state may have moved while waiting.
        let subscription = self.subscriptions.find_by_id(subscription_id).await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        if subscription.status != SubscriptionStatus::Active {
            return Err(AppError::InvalidTransition(format!(
                "Cannot freeze a {} subscription",
                subscription.status
            )));
        }

        let package = self.packages.find_by_id(&subscription.package_id).await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        validate_freeze_window(freeze_start, freeze_end, &package, subscription.freezes_used)?;

        let frozen = self
            .subscriptions
            .set_frozen(&subscription.id, freeze_start, freeze_end, reason)
            .await?;
        info!(subscription_id = %frozen.id, member_id = %frozen.member_id, "subscription frozen");
        Ok(frozen)
    }

    pub async fn unfreeze(&self, subscription_id: &str) -> Result<Subscription, AppError> {
        let found = self.subscriptions.find_by_id(subscription_id).await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        let _guard = self.locks.acquire(&found.member_id).await;

        let subscription = self.subscriptions.find_by_id(subscription_id).await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        if subscription.status != SubscriptionStatus::Frozen {
            return Err(AppError::InvalidTransition(format!(
                "Cannot unfreeze a {} subscription",
                subscription.status
            )));
        }

        let active = self.subscriptions.set_active(&subscription.id).await?;
        info!(subscription_id = %active.id, member_id = %active.member_id, "subscription unfrozen");
        Ok(active)
    }

    /// Lazy expiration at read time. Surfacing a subscription through any
    /// days-remaining computation goes through here first, so status and
    /// remaining days are always consistent for the caller.
    pub async fn reconcile(
        &self,
        subscription: Subscription,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        if subscription.status != SubscriptionStatus::Active
            || days_remaining(subscription.end_date, now) > 0
        {
            return Ok(subscription);
        }

        // Re-read under the member lock: a concurrent renewal may have
        // superseded this row already, and expiring it then would stamp
        // the member over the renewal's status write.
        let _guard = self.locks.acquire(&subscription.member_id).await;
        let current = match self.subscriptions.find_by_id(&subscription.id).await? {
            Some(current) => current,
            None => return Ok(subscription),
        };

        if current.status == SubscriptionStatus::Active
            && days_remaining(current.end_date, now) == 0
        {
            let expired = self.subscriptions.mark_expired(&current.id).await?;
            info!(subscription_id = %expired.id, member_id = %expired.member_id, "subscription expired on read");
            return Ok(expired);
        }
        Ok(current)
    }

    /// Batch counterpart of `reconcile`, run by the background sweep so
    /// members nobody reads still converge to `expired`.
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let lapsed = self.subscriptions.find_lapsed(now.date_naive()).await?;
        let mut count = 0;
        for subscription in lapsed {
            let _guard = self.locks.acquire(&subscription.member_id).await;
            let current = match self.subscriptions.find_by_id(&subscription.id).await? {
                Some(current) => current,
                None => continue,
            };
            if current.status == SubscriptionStatus::Active {
                self.subscriptions.mark_expired(&current.id).await?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Administrative override: the one member-status write a client may
    /// request directly, and the only value it may request.
    pub async fn deactivate(&self, member_id: &str) -> Result<Member, AppError> {
        let _guard = self.locks.acquire(member_id).await;
        let member = self.members.set_status(member_id, MemberStatus::Inactive).await?;
        info!(member_id = %member.id, "member deactivated by administrative override");
        Ok(member)
    }
}
