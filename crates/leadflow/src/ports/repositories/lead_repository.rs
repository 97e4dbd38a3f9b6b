//! Lead Repository Port
//!
//! Abstract interface for lead persistence. The `try_*` operations are
//! the atomic conditional updates the concurrency contract requires:
//! each one re-checks the transition guard inside the update itself and
//! returns `None` (or `false`) when another writer got there first, so
//! read-then-write races cannot lose updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{EngineError, Lead};

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, EngineError>;

    async fn insert(&self, lead: &Lead) -> Result<Lead, EngineError>;

    /// Non-archived leads whose stored phone contains the suffix key,
    /// candidates for the phone matcher.
    async fn find_by_phone_suffix(&self, suffix_key: &str) -> Result<Vec<Lead>, EngineError>;

    /// Assign iff the lead is still unassigned. Returns the updated
    /// lead, or `None` when the guard failed.
    async fn try_assign(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        assigned_at: DateTime<Utc>,
        claim_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError>;

    /// Claim iff the lead is still awaiting claim and still assigned to
    /// `agent_id`. At-most-one-winner under concurrent claims.
    async fn try_claim(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        claimed_at: DateTime<Utc>,
        contact_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError>;

    /// Record first contact iff none is recorded yet. `None` means the
    /// lead was already contacted (or not in a contactable phase);
    /// callers treat that as the idempotent no-op.
    async fn try_record_contact(
        &self,
        lead_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError>;

    /// Flag a claim-window breach iff still unclaimed, unflagged, and
    /// past the deadline. `false` when another sweep already did it.
    async fn try_mark_claim_breached(
        &self,
        lead_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError>;

    /// Leads awaiting claim whose deadline passed and breach flag is
    /// still clear. The sweeper's work list.
    async fn find_claim_breaches(&self, now: DateTime<Utc>) -> Result<Vec<Lead>, EngineError>;
}
