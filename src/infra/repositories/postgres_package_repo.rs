use crate::domain::{models::package::Package, ports::PackageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPackageRepo {
    pool: PgPool,
}

impl PostgresPackageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PackageRepository for PostgresPackageRepo {
    async fn create(&self, package: &Package) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            "INSERT INTO packages (id, name, description, duration_days, price, discounted_price, max_freezes, freeze_days_allowed, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&package.id).bind(&package.name).bind(&package.description).bind(package.duration_days)
            .bind(package.price).bind(package.discounted_price).bind(package.max_freezes)
            .bind(package.freeze_days_allowed).bind(package.is_active).bind(package.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Package>, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Package>, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages ORDER BY price ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, package: &Package) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            "UPDATE packages SET name = $1, description = $2, duration_days = $3, price = $4, discounted_price = $5, max_freezes = $6, freeze_days_allowed = $7 WHERE id = $8 RETURNING *"
        )
            .bind(&package.name).bind(&package.description).bind(package.duration_days).bind(package.price)
            .bind(package.discounted_price).bind(package.max_freezes).bind(package.freeze_days_allowed)
            .bind(&package.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>("UPDATE packages SET is_active = $1 WHERE id = $2 RETURNING *")
            .bind(is_active).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Package not found".into())); }
        Ok(())
    }
}
