use crate::domain::{
    models::payment::Payment,
    ports::{PaymentListFilter, PaymentRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPaymentRepo {
    pool: PgPool,
}

impl PostgresPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepo {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, member_id, branch_id, subscription_id, invoice_number, amount, method, status, paid_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&payment.id).bind(&payment.member_id).bind(&payment.branch_id).bind(&payment.subscription_id)
            .bind(&payment.invoice_number).bind(payment.amount).bind(&payment.method).bind(&payment.status)
            .bind(payment.paid_at).bind(payment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, filter: &PaymentListFilter) -> Result<Vec<Payment>, AppError> {
        let mut sql = String::from("SELECT * FROM payments WHERE 1 = 1");
        let mut arg = 0;
        if filter.branch_id.is_some() { arg += 1; sql.push_str(&format!(" AND branch_id = ${}", arg)); }
        if filter.member_id.is_some() { arg += 1; sql.push_str(&format!(" AND member_id = ${}", arg)); }
        if filter.status.is_some() { arg += 1; sql.push_str(&format!(" AND status = ${}", arg)); }
        sql.push_str(" ORDER BY paid_at DESC");

        let mut query = sqlx::query_as::<_, Payment>(&sql);
        if let Some(branch_id) = &filter.branch_id { query = query.bind(branch_id); }
        if let Some(member_id) = &filter.member_id { query = query.bind(member_id); }
        if let Some(status) = &filter.status { query = query.bind(status); }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
