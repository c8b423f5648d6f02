use crate::domain::{
    models::payment::Payment,
    ports::{PaymentListFilter, PaymentRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepo {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, member_id, branch_id, subscription_id, invoice_number, amount, method, status, paid_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&payment.id).bind(&payment.member_id).bind(&payment.branch_id).bind(&payment.subscription_id)
            .bind(&payment.invoice_number).bind(payment.amount).bind(&payment.method).bind(&payment.status)
            .bind(payment.paid_at).bind(payment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, filter: &PaymentListFilter) -> Result<Vec<Payment>, AppError> {
        let mut sql = String::from("SELECT * FROM payments WHERE 1 = 1");
        if filter.branch_id.is_some() { sql.push_str(" AND branch_id = ?"); }
        if filter.member_id.is_some() { sql.push_str(" AND member_id = ?"); }
        if filter.status.is_some() { sql.push_str(" AND status = ?"); }
        sql.push_str(" ORDER BY paid_at DESC");

        let mut query = sqlx::query_as::<_, Payment>(&sql);
        if let Some(branch_id) = &filter.branch_id { query = query.bind(branch_id); }
        if let Some(member_id) = &filter.member_id { query = query.bind(member_id); }
        if let Some(status) = &filter.status { query = query.bind(status); }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
