use crate::domain::{
    models::member::{Member, MemberStatus},
    ports::{MemberListFilter, MemberRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMemberRepo {
    pool: SqlitePool,
}

impl SqliteMemberRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepo {
    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (id, branch_id, code, name, phone, email, status, joining_date, total_visits, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&member.id).bind(&member.branch_id).bind(&member.code).bind(&member.name)
            .bind(&member.phone).bind(&member.email).bind(member.status).bind(member.joining_date)
            .bind(member.total_visits).bind(member.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE code = ?").bind(code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE phone = ?").bind(phone).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, filter: &MemberListFilter) -> Result<Vec<Member>, AppError> {
        let mut sql = String::from("SELECT * FROM members WHERE 1 = 1");
        if filter.branch_id.is_some() { sql.push_str(" AND branch_id = ?"); }
        if filter.status.is_some() { sql.push_str(" AND status = ?"); }
        if filter.search.is_some() { sql.push_str(" AND (name LIKE ? OR phone LIKE ? OR code LIKE ?)"); }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Member>(&sql);
        if let Some(branch_id) = &filter.branch_id { query = query.bind(branch_id); }
        if let Some(status) = filter.status { query = query.bind(status); }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, member: &Member) -> Result<Member, AppError> {
        // status is deliberately absent: it moves through set_status only
        sqlx::query_as::<_, Member>(
            "UPDATE members SET branch_id = ?, name = ?, phone = ?, email = ? WHERE id = ? RETURNING *"
        )
            .bind(&member.branch_id).bind(&member.name).bind(&member.phone).bind(&member.email)
            .bind(&member.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_status(&self, id: &str, status: MemberStatus) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>("UPDATE members SET status = ? WHERE id = ? RETURNING *")
            .bind(status).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
