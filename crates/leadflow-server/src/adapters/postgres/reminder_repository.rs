//! PostgreSQL implementation of ReminderRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{EngineError, Reminder, ReminderRepository, ReminderType};

/// PostgreSQL implementation of ReminderRepository
pub struct PgReminderRepository {
    pool: PgPool,
}

impl PgReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ReminderRow {
    id: Uuid,
    agent_id: Uuid,
    lead_id: Option<Uuid>,
    title: String,
    notes: Option<String>,
    reminder_type: String,
    reminder_datetime: DateTime<Utc>,
    snoozed_until: Option<DateTime<Utc>>,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
    send_email: bool,
    send_chat: bool,
    last_notified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReminderRow> for Reminder {
    fn from(row: ReminderRow) -> Self {
        let reminder_type = row
            .reminder_type
            .parse()
            .unwrap_or(ReminderType::Other);
        Self {
            id: row.id,
            agent_id: row.agent_id,
            lead_id: row.lead_id,
            title: row.title,
            notes: row.notes,
            reminder_type,
            reminder_datetime: row.reminder_datetime,
            snoozed_until: row.snoozed_until,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
            send_email: row.send_email,
            send_chat: row.send_chat,
            last_notified_at: row.last_notified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ReminderRepository for PgReminderRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reminder>, EngineError> {
        let row = sqlx::query_as::<_, ReminderRow>("SELECT * FROM reminders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, EngineError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            INSERT INTO reminders (
                id, agent_id, lead_id, title, notes, reminder_type,
                reminder_datetime, send_email, send_chat, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(reminder.id)
        .bind(reminder.agent_id)
        .bind(reminder.lead_id)
        .bind(&reminder.title)
        .bind(&reminder.notes)
        .bind(reminder.reminder_type.as_str())
        .bind(reminder.reminder_datetime)
        .bind(reminder.send_email)
        .bind(reminder.send_chat)
        .bind(reminder.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn save(&self, reminder: &Reminder) -> Result<Reminder, EngineError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            UPDATE reminders
            SET title = $2, notes = $3, reminder_type = $4, reminder_datetime = $5,
                snoozed_until = $6, is_completed = $7, completed_at = $8,
                send_email = $9, send_chat = $10, last_notified_at = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reminder.id)
        .bind(&reminder.title)
        .bind(&reminder.notes)
        .bind(reminder.reminder_type.as_str())
        .bind(reminder.reminder_datetime)
        .bind(reminder.snoozed_until)
        .bind(reminder.is_completed)
        .bind(reminder.completed_at)
        .bind(reminder.send_email)
        .bind(reminder.send_chat)
        .bind(reminder.last_notified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, EngineError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, EngineError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT * FROM reminders
            WHERE is_completed = FALSE
              AND reminder_datetime <= $1
              AND (snoozed_until IS NULL OR snoozed_until <= $1)
            ORDER BY reminder_datetime ASC, id ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
