//! PostgreSQL implementation of AgentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{Agent, AgentRepository, EngineError, Language};

/// PostgreSQL implementation of AgentRepository
pub struct PgAgentRepository {
    pool: PgPool,
}

impl PgAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    languages: Vec<String>,
    max_active_leads: i32,
    current_lead_count: i32,
    is_active: bool,
    accepts_new_leads: bool,
    email_notifications: bool,
    slack_notifications: bool,
    slack_channel_ids: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        // Unknown language codes in admin data are skipped, not fatal
        let languages = row
            .languages
            .iter()
            .filter_map(|code| match code.parse::<Language>() {
                Ok(lang) => Some(lang),
                Err(_) => {
                    tracing::warn!(agent_id = %row.id, code = %code, "Skipping unknown agent language");
                    None
                }
            })
            .collect();

        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            languages,
            max_active_leads: row.max_active_leads,
            current_lead_count: row.current_lead_count,
            is_active: row.is_active,
            accepts_new_leads: row.accepts_new_leads,
            email_notifications: row.email_notifications,
            slack_notifications: row.slack_notifications,
            slack_channel_ids: row.slack_channel_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AgentRepository for PgAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, EngineError> {
        let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_eligible(&self, language: Language) -> Result<Vec<Agent>, EngineError> {
        let rows = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT * FROM agents
            WHERE is_active = TRUE AND accepts_new_leads = TRUE
              AND $1 = ANY(languages)
              AND current_lead_count < max_active_leads
            ORDER BY id ASC
            "#,
        )
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn try_reserve_slot(&self, agent_id: Uuid) -> Result<bool, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE agents
            SET current_lead_count = current_lead_count + 1, updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE AND accepts_new_leads = TRUE
              AND current_lead_count < max_active_leads
            "#,
        )
        .bind(agent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn release_slot(&self, agent_id: Uuid) -> Result<(), EngineError> {
        sqlx::query(
            r#"
            UPDATE agents
            SET current_lead_count = GREATEST(current_lead_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(agent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Agent>, EngineError> {
        if email.is_none() && phone.is_none() {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT * FROM agents
            WHERE ($1::TEXT IS NOT NULL AND email = $1)
               OR ($2::TEXT IS NOT NULL AND phone = $2)
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }
}
