//! PostgreSQL implementation of CallEventRepository
//!
//! The unique index on `provider_call_id` is the idempotency mechanism
//! for at-least-once webhook delivery: `ON CONFLICT DO NOTHING` turns a
//! replay into a clean duplicate signal instead of an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{CallDirection, CallEvent, CallEventRepository, CallInsert, EngineError};

/// PostgreSQL implementation of CallEventRepository
pub struct PgCallEventRepository {
    pool: PgPool,
}

impl PgCallEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CallEventRow {
    id: Uuid,
    provider_call_id: String,
    agent_id: Uuid,
    lead_id: Option<Uuid>,
    direction: Option<String>,
    answered: bool,
    duration_seconds: i32,
    phone_number: Option<String>,
    recording_url: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<CallEventRow> for CallEvent {
    fn from(row: CallEventRow) -> Self {
        let direction = row.direction.as_deref().and_then(|d| match d {
            "inbound" => Some(CallDirection::Inbound),
            "outbound" => Some(CallDirection::Outbound),
            _ => None,
        });
        Self {
            id: row.id,
            provider_call_id: row.provider_call_id,
            agent_id: row.agent_id,
            lead_id: row.lead_id,
            direction,
            answered: row.answered,
            duration_seconds: row.duration_seconds,
            phone_number: row.phone_number,
            recording_url: row.recording_url,
            started_at: row.started_at,
            ended_at: row.ended_at,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CallEventRepository for PgCallEventRepository {
    async fn record(&self, call: &CallEvent) -> Result<CallInsert, EngineError> {
        let row = sqlx::query_as::<_, CallEventRow>(
            r#"
            INSERT INTO call_events (
                id, provider_call_id, agent_id, lead_id, direction, answered,
                duration_seconds, phone_number, recording_url, started_at,
                ended_at, metadata, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (provider_call_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(call.id)
        .bind(&call.provider_call_id)
        .bind(call.agent_id)
        .bind(call.lead_id)
        .bind(call.direction.map(|d| d.as_str()))
        .bind(call.answered)
        .bind(call.duration_seconds)
        .bind(&call.phone_number)
        .bind(&call.recording_url)
        .bind(call.started_at)
        .bind(call.ended_at)
        .bind(&call.metadata)
        .bind(call.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(match row {
            Some(row) => CallInsert::Recorded(row.into()),
            None => CallInsert::Duplicate,
        })
    }
}
