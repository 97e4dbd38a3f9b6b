//! Activity - Audit Trail Entry
//!
//! Append-only notes written by the engine's automated paths: breach
//! escalations, assignment records. Call logs live in the call event
//! table; activities cover everything else a human later audits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub lead_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn note(
        lead_id: Option<Uuid>,
        agent_id: Option<Uuid>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead_id,
            agent_id,
            notes: notes.into(),
            created_at: now,
        }
    }
}
