//! Call Webhook DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Telephony provider webhook payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CallWebhookRequest {
    pub call_id: String,
    pub agent_email: Option<String>,
    pub agent_phone: Option<String>,
    pub phone_number: Option<String>,
    /// "inbound" or "outbound"
    pub direction: Option<String>,
    #[serde(default)]
    pub answered: bool,
    #[serde(default)]
    pub duration: i32,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Always returned with HTTP 200 so the provider never retries.
#[derive(Debug, Serialize, ToSchema)]
pub struct CallWebhookResponse {
    pub success: bool,
    pub duplicate: bool,
    pub agent_matched: bool,
    pub lead_matched: bool,
    pub call_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallWebhookResponse {
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            duplicate: false,
            agent_matched: false,
            lead_matched: false,
            call_id: None,
            error: Some(error.into()),
        }
    }
}
