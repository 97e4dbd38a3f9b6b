//! Call Event - Telephony Webhook Record
//!
//! One row per provider delivery. The unique provider call id is the
//! engine's sole idempotency mechanism for webhook replays: a duplicate
//! delivery is a success no-op, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
        }
    }
}

/// A call logged from the telephony provider's webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEvent {
    pub id: Uuid,
    /// Provider-side id, unique in the store.
    pub provider_call_id: String,
    pub agent_id: Uuid,
    /// Matched best-effort via the phone suffix heuristic; absent when
    /// no open lead carried the caller's number.
    pub lead_id: Option<Uuid>,
    pub direction: Option<CallDirection>,
    pub answered: bool,
    pub duration_seconds: i32,
    pub phone_number: Option<String>,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Raw provider payload, kept for audit.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CallEvent {
    /// "3m 42s" style duration for notification copy, empty for zero.
    pub fn duration_label(&self) -> String {
        if self.duration_seconds <= 0 {
            return String::new();
        }
        let minutes = self.duration_seconds / 60;
        let seconds = self.duration_seconds % 60;
        format!("{minutes}m {seconds}s")
    }

    pub fn outcome(&self) -> &'static str {
        if self.answered {
            "answered"
        } else {
            "no_answer"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_label() {
        let mut call = CallEvent {
            id: Uuid::new_v4(),
            provider_call_id: "st-1".to_string(),
            agent_id: Uuid::new_v4(),
            lead_id: None,
            direction: Some(CallDirection::Inbound),
            answered: true,
            duration_seconds: 222,
            phone_number: None,
            recording_url: None,
            started_at: None,
            ended_at: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
        };
        assert_eq!(call.duration_label(), "3m 42s");

        call.duration_seconds = 0;
        assert_eq!(call.duration_label(), "");
    }
}
