use crate::domain::{models::branch::Branch, ports::BranchRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBranchRepo {
    pool: SqlitePool,
}

impl SqliteBranchRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for SqliteBranchRepo {
    async fn create(&self, branch: &Branch) -> Result<Branch, AppError> {
        sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (id, code, name, timezone, capacity, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&branch.id).bind(&branch.code).bind(&branch.name).bind(&branch.timezone)
            .bind(branch.capacity).bind(branch.is_active).bind(branch.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, branch: &Branch) -> Result<Branch, AppError> {
        // code is assigned once at creation and never changes
        sqlx::query_as::<_, Branch>(
            "UPDATE branches SET name = ?, timezone = ?, capacity = ?, is_active = ? WHERE id = ? RETURNING *"
        )
            .bind(&branch.name).bind(&branch.timezone).bind(branch.capacity).bind(branch.is_active)
            .bind(&branch.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM branches WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Branch not found".into())); }
        Ok(())
    }
}
