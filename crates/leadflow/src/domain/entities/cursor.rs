//! Round-Robin Cursor
//!
//! One record per language: the rotation position used to pick the next
//! agent, plus the fallback admin who receives claim-SLA escalations.
//! Advanced only by the assigner, via an atomic compare-and-advance in
//! the store; there is no shared in-memory counter across instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::sla::SlaConfig;
use crate::domain::value_objects::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRobinCursor {
    pub id: Uuid,
    pub language: Language,
    /// Rotation position over the language's agents, sorted by agent id.
    /// Wraps modulo the roster size at read time.
    pub rotation_cursor: i32,
    pub fallback_admin_id: Option<Uuid>,
    /// Optional per-language override of the claim window.
    pub claim_window_minutes: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoundRobinCursor {
    /// Effective claim window, falling back to the global configuration.
    pub fn claim_window(&self, config: &SlaConfig) -> i64 {
        self.claim_window_minutes
            .map(i64::from)
            .unwrap_or(config.claim_window_minutes)
    }

    /// Rotate a roster (already sorted by agent id) so the agent due
    /// next comes first, wrapping past the end.
    pub fn rotation_order(&self, roster_len: usize) -> impl Iterator<Item = usize> {
        let len = roster_len.max(1);
        let start = self.rotation_cursor.rem_euclid(len as i32) as usize;
        (0..roster_len).map(move |i| (start + i) % len)
    }
}
