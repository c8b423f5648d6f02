use crate::domain::{models::branch::Branch, ports::BranchRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBranchRepo {
    pool: PgPool,
}

impl PostgresBranchRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PostgresBranchRepo {
    async fn create(&self, branch: &Branch) -> Result<Branch, AppError> {
        sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (id, code, name, timezone, capacity, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&branch.id).bind(&branch.code).bind(&branch.name).bind(&branch.timezone)
            .bind(branch.capacity).bind(branch.is_active).bind(branch.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, branch: &Branch) -> Result<Branch, AppError> {
        // code is assigned once at creation and never changes
        sqlx::query_as::<_, Branch>(
            "UPDATE branches SET name = $1, timezone = $2, capacity = $3, is_active = $4 WHERE id = $5 RETURNING *"
        )
            .bind(&branch.name).bind(&branch.timezone).bind(branch.capacity).bind(branch.is_active)
            .bind(&branch.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Branch not found".into())); }
        Ok(())
    }
}
