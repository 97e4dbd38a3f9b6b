//! PostgreSQL implementation of LeadRepository
//!
//! The `try_*` operations re-check the transition guard inside the
//! UPDATE's WHERE clause, so concurrent writers resolve to exactly one
//! winner at the row level instead of racing a read-then-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadflow::{EngineError, Lead, LeadRepository};

/// PostgreSQL implementation of LeadRepository
pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    phone_number: String,
    email: Option<String>,
    language: String,
    lead_source: Option<String>,
    assigned_agent_id: Option<Uuid>,
    assigned_at: Option<DateTime<Utc>>,
    claimed: bool,
    claimed_at: Option<DateTime<Utc>>,
    claim_timer_expires_at: Option<DateTime<Utc>>,
    claim_sla_breached: bool,
    first_contact_at: Option<DateTime<Utc>>,
    last_contact_at: Option<DateTime<Utc>>,
    contact_timer_expires_at: Option<DateTime<Utc>>,
    contact_sla_breached: bool,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_domain(self) -> Result<Lead, EngineError> {
        let language = self
            .language
            .parse()
            .map_err(|_| EngineError::Repository(format!("Bad language column: {}", self.language)))?;
        Ok(Lead {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
            language,
            lead_source: self.lead_source,
            assigned_agent_id: self.assigned_agent_id,
            assigned_at: self.assigned_at,
            claimed: self.claimed,
            claimed_at: self.claimed_at,
            claim_timer_expires_at: self.claim_timer_expires_at,
            claim_sla_breached: self.claim_sla_breached,
            first_contact_at: self.first_contact_at,
            last_contact_at: self.last_contact_at,
            contact_timer_expires_at: self.contact_timer_expires_at,
            contact_sla_breached: self.contact_sla_breached,
            archived: self.archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn rows_into_domain(rows: Vec<LeadRow>) -> Result<Vec<Lead>, EngineError> {
    rows.into_iter().map(LeadRow::into_domain).collect()
}

#[async_trait]
impl LeadRepository for PgLeadRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, EngineError> {
        let row = sqlx::query_as::<_, LeadRow>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.map(LeadRow::into_domain).transpose()
    }

    async fn insert(&self, lead: &Lead) -> Result<Lead, EngineError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            INSERT INTO leads (
                id, first_name, last_name, phone_number, email, language,
                lead_source, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(lead.id)
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.phone_number)
        .bind(&lead.email)
        .bind(lead.language.as_str())
        .bind(&lead.lead_source)
        .bind(lead.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.into_domain()
    }

    async fn find_by_phone_suffix(&self, suffix_key: &str) -> Result<Vec<Lead>, EngineError> {
        // Digit-only comparison so stored formatting does not matter;
        // the matcher re-checks candidates and picks the newest.
        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT * FROM leads
            WHERE archived = FALSE
              AND regexp_replace(phone_number, '\D', '', 'g') LIKE '%' || $1 || '%'
            ORDER BY created_at DESC
            LIMIT 50
            "#,
        )
        .bind(suffix_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        rows_into_domain(rows)
    }

    async fn try_assign(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        assigned_at: DateTime<Utc>,
        claim_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads
            SET assigned_agent_id = $2, assigned_at = $3,
                claim_timer_expires_at = $4, updated_at = NOW()
            WHERE id = $1 AND assigned_agent_id IS NULL AND archived = FALSE
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(agent_id)
        .bind(assigned_at)
        .bind(claim_deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.map(LeadRow::into_domain).transpose()
    }

    async fn try_claim(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        claimed_at: DateTime<Utc>,
        contact_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads
            SET claimed = TRUE, claimed_at = $3, claim_timer_expires_at = NULL,
                contact_timer_expires_at = $4, updated_at = NOW()
            WHERE id = $1 AND assigned_agent_id = $2 AND claimed = FALSE
              AND first_contact_at IS NULL AND archived = FALSE
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(agent_id)
        .bind(claimed_at)
        .bind(contact_deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.map(LeadRow::into_domain).transpose()
    }

    async fn try_record_contact(
        &self,
        lead_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads
            SET first_contact_at = $2, last_contact_at = $2,
                contact_timer_expires_at = NULL, contact_sla_breached = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND claimed = TRUE AND first_contact_at IS NULL
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        row.map(LeadRow::into_domain).transpose()
    }

    async fn try_mark_claim_breached(
        &self,
        lead_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET claim_sla_breached = TRUE, updated_at = NOW()
            WHERE id = $1 AND claimed = FALSE AND claim_sla_breached = FALSE
              AND claim_timer_expires_at IS NOT NULL AND claim_timer_expires_at < $2
              AND archived = FALSE
            "#,
        )
        .bind(lead_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_claim_breaches(&self, now: DateTime<Utc>) -> Result<Vec<Lead>, EngineError> {
        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT * FROM leads
            WHERE claimed = FALSE AND claim_sla_breached = FALSE AND archived = FALSE
              AND claim_timer_expires_at IS NOT NULL AND claim_timer_expires_at < $1
            ORDER BY claim_timer_expires_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Repository(e.to_string()))?;

        rows_into_domain(rows)
    }
}
