//! PostgreSQL implementation of ActivityRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{Activity, ActivityRepository, EngineError};

/// PostgreSQL implementation of ActivityRepository
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    lead_id: Option<Uuid>,
    agent_id: Option<Uuid>,
    notes: String,
    created_at: DateTime<Utc>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            lead_id: row.lead_id,
            agent_id: row.agent_id,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn insert(&self, activity: &Activity) -> Result<Activity, EngineError> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            INSERT INTO activities (id, lead_id, agent_id, notes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(activity.id)
        .bind(activity.lead_id)
        .bind(activity.agent_id)
        .bind(&activity.notes)
        .bind(activity.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.into())
    }
}
