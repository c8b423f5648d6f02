use crate::domain::{
    models::subscription::{Subscription, SubscriptionStatus},
    ports::SubscriptionRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteSubscriptionRepo {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepo {
    async fn create_superseding(&self, subscription: &Subscription) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("UPDATE subscriptions SET status = 'expired' WHERE member_id = ? AND status = 'active'")
            .bind(&subscription.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (id, member_id, package_id, start_date, end_date, status, freeze_start, freeze_end, freeze_reason, freezes_used, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&subscription.id).bind(&subscription.member_id).bind(&subscription.package_id)
            .bind(subscription.start_date).bind(subscription.end_date).bind(subscription.status)
            .bind(subscription.freeze_start).bind(subscription.freeze_end).bind(&subscription.freeze_reason)
            .bind(subscription.freezes_used).bind(subscription.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE members SET status = 'active' WHERE id = ?")
            .bind(&subscription.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_active_for_member(&self, member_id: &str) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE member_id = ? AND status = 'active'")
            .bind(member_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, member_id: Option<&str>, status: Option<SubscriptionStatus>) -> Result<Vec<Subscription>, AppError> {
        let mut sql = String::from("SELECT * FROM subscriptions WHERE 1 = 1");
        if member_id.is_some() { sql.push_str(" AND member_id = ?"); }
        if status.is_some() { sql.push_str(" AND status = ?"); }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Subscription>(&sql);
        if let Some(member_id) = member_id { query = query.bind(member_id); }
        if let Some(status) = status { query = query.bind(status); }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_frozen(&self, id: &str, freeze_start: NaiveDate, freeze_end: NaiveDate, reason: Option<String>) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let frozen = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = 'frozen', freeze_start = ?, freeze_end = ?, freeze_reason = ?, freezes_used = freezes_used + 1 WHERE id = ? RETURNING *"
        )
            .bind(freeze_start).bind(freeze_end).bind(&reason).bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE members SET status = 'frozen' WHERE id = ?")
            .bind(&frozen.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(frozen)
    }
    async fn set_active(&self, id: &str) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let active = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = 'active', freeze_start = NULL, freeze_end = NULL WHERE id = ? RETURNING *"
        )
            .bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE members SET status = 'active' WHERE id = ?")
            .bind(&active.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(active)
    }
    async fn mark_expired(&self, id: &str) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let expired = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = 'expired' WHERE id = ? RETURNING *"
        )
            .bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE members SET status = 'expired' WHERE id = ?")
            .bind(&expired.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(expired)
    }
    async fn find_lapsed(&self, today: NaiveDate) -> Result<Vec<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE status = 'active' AND end_date <= ?")
            .bind(today).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
