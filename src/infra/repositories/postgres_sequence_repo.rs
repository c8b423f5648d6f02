use crate::domain::ports::SequenceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresSequenceRepo {
    pool: PgPool,
}

impl PostgresSequenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceRepository for PostgresSequenceRepo {
    async fn next_value(&self, kind: &str, scope: &str) -> Result<i64, AppError> {
        // The upsert takes a row lock, so concurrent callers serialize on
        // the (kind, scope) row and each reads back its own increment.
        let row = sqlx::query(
            "INSERT INTO code_sequences (kind, scope, value) VALUES ($1, $2, 1)
             ON CONFLICT (kind, scope) DO UPDATE SET value = code_sequences.value + 1
             RETURNING value"
        )
            .bind(kind).bind(scope)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("value"))
    }
}
