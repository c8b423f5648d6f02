use crate::domain::{models::package::Package, ports::PackageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePackageRepo {
    pool: SqlitePool,
}

impl SqlitePackageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PackageRepository for SqlitePackageRepo {
    async fn create(&self, package: &Package) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            "INSERT INTO packages (id, name, description, duration_days, price, discounted_price, max_freezes, freeze_days_allowed, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&package.id).bind(&package.name).bind(&package.description).bind(package.duration_days)
            .bind(package.price).bind(package.discounted_price).bind(package.max_freezes)
            .bind(package.freeze_days_allowed).bind(package.is_active).bind(package.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Package>, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Package>, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages ORDER BY price ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, package: &Package) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            "UPDATE packages SET name = ?, description = ?, duration_days = ?, price = ?, discounted_price = ?, max_freezes = ?, freeze_days_allowed = ? WHERE id = ? RETURNING *"
        )
            .bind(&package.name).bind(&package.description).bind(package.duration_days).bind(package.price)
            .bind(package.discounted_price).bind(package.max_freezes).bind(package.freeze_days_allowed)
            .bind(&package.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>("UPDATE packages SET is_active = ? WHERE id = ? RETURNING *")
            .bind(is_active).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM packages WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Package not found".into())); }
        Ok(())
    }
}
