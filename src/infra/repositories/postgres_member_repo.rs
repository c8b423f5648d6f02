use crate::domain::{
    models::member::{Member, MemberStatus},
    ports::{MemberListFilter, MemberRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresMemberRepo {
    pool: PgPool,
}

impl PostgresMemberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepo {
    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (id, branch_id, code, name, phone, email, status, joining_date, total_visits, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&member.id).bind(&member.branch_id).bind(&member.code).bind(&member.name)
            .bind(&member.phone).bind(&member.email).bind(member.status).bind(member.joining_date)
            .bind(member.total_visits).bind(member.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE code = $1").bind(code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE phone = $1").bind(phone).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, filter: &MemberListFilter) -> Result<Vec<Member>, AppError> {
        let mut sql = String::from("SELECT * FROM members WHERE 1 = 1");
        let mut arg = 0;
        if filter.branch_id.is_some() { arg += 1; sql.push_str(&format!(" AND branch_id = ${}", arg)); }
        if filter.status.is_some() { arg += 1; sql.push_str(&format!(" AND status = ${}", arg)); }
        if filter.search.is_some() {
            sql.push_str(&format!(" AND (name ILIKE ${} OR phone ILIKE ${} OR code ILIKE ${})", arg + 1, arg + 2, arg + 3));
        }
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
            "UPDATE members SET branch_id = $1, name = $2, phone = $3, email = $4 WHERE id = $5 RETURNING *"
        )
            .bind(&member.branch_id).bind(&member.name).bind(&member.phone).bind(&member.email)
            .bind(&member.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_status(&self, id: &str, status: MemberStatus) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>("UPDATE members SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
