use crate::domain::{
    models::attendance::AttendanceRecord,
    ports::{AttendanceListFilter, AttendanceRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn find_open(&self, member_id: &str, date: NaiveDate) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE member_id = $1 AND date = $2 AND check_out IS NULL"
        )
            .bind(member_id).bind(date)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn insert_checkin(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (id, member_id, branch_id, date, check_in, check_out, duration_minutes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.member_id).bind(&record.branch_id).bind(record.date)
            .bind(record.check_in).bind(record.check_out).bind(record.duration_minutes).bind(record.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE members SET total_visits = total_visits + 1 WHERE id = $1")
            .bind(&record.member_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn close(&self, id: &str, check_out: DateTime<Utc>, duration_minutes: i64) -> Result<AttendanceRecord, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET check_out = $1, duration_minutes = $2 WHERE id = $3 RETURNING *"
        )
            .bind(check_out).bind(duration_minutes).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, filter: &AttendanceListFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut sql = String::from("SELECT * FROM attendance_records WHERE 1 = 1");
        let mut arg = 0;
        if filter.branch_id.is_some() { arg += 1; sql.push_str(&format!(" AND branch_id = ${}", arg)); }
        if filter.date.is_some() { arg += 1; sql.push_str(&format!(" AND date = ${}", arg)); }
        if filter.member_id.is_some() { arg += 1; sql.push_str(&format!(" AND member_id = ${}", arg)); }
        sql.push_str(" ORDER BY check_in DESC");

        let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
        if let Some(branch_id) = &filter.branch_id { query = query.bind(branch_id); }
        if let Some(date) = filter.date { query = query.bind(date); }
        if let Some(member_id) = &filter.member_id { query = query.bind(member_id); }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_for_member(&self, member_id: &str, limit: i64) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE member_id = $1 ORDER BY check_in DESC LIMIT $2"
        )
            .bind(member_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_open_for_branch(&self, branch_id: &str, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE branch_id = $1 AND date = $2 AND check_out IS NULL ORDER BY check_in DESC"
        )
            .bind(branch_id).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
