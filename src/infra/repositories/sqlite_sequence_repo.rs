use crate::domain::ports::SequenceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteSequenceRepo {
    pool: SqlitePool,
}

impl SqliteSequenceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceRepository for SqliteSequenceRepo {
    async fn next_value(&self, kind: &str, scope: &str) -> Result<i64, AppError> {
        // Single-statement upsert: SQLite serializes writers, so each
        // caller reads back its own increment.
        let row = sqlx::query(
            "INSERT INTO code_sequences (kind, scope, value) VALUES (?, ?, 1)
             ON CONFLICT (kind, scope) DO UPDATE SET value = code_sequences.value + 1
             RETURNING value"
        )
            .bind(kind).bind(scope)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("value"))
    }
}
