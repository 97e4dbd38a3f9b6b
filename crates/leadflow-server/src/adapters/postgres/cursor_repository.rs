//! PostgreSQL implementation of CursorRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{CursorRepository, EngineError, Language, RoundRobinCursor};

/// PostgreSQL implementation of CursorRepository
pub struct PgCursorRepository {
    pool: PgPool,
}

impl PgCursorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CursorRow {
    id: Uuid,
    language: String,
    rotation_cursor: i32,
    fallback_admin_id: Option<Uuid>,
    claim_window_minutes: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CursorRow {
    fn into_domain(self) -> Result<RoundRobinCursor, EngineError> {
        let language = self
            .language
            .parse()
            .map_err(|_| EngineError::Repository(format!("Bad language column: {}", self.language)))?;
        Ok(RoundRobinCursor {
            id: self.id,
            language,
            rotation_cursor: self.rotation_cursor,
            fallback_admin_id: self.fallback_admin_id,
            claim_window_minutes: self.claim_window_minutes,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl CursorRepository for PgCursorRepository {
    async fn find_by_language(
        &self,
        language: Language,
    ) -> Result<Option<RoundRobinCursor>, EngineError> {
        let row = sqlx::query_as::<_, CursorRow>(
            "SELECT * FROM round_robin_cursors WHERE language = $1 AND is_active = TRUE",
        )
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.map(CursorRow::into_domain).transpose()
    }

    async fn try_advance(
        &self,
        language: Language,
        expected: i32,
        next: i32,
    ) -> Result<bool, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE round_robin_cursors
            SET rotation_cursor = $3, updated_at = NOW()
            WHERE language = $1 AND rotation_cursor = $2
            "#,
        )
        .bind(language.as_str())
        .bind(expected)
        .bind(next)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
