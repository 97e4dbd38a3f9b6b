//! In-App Notification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What triggered an in-app notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LeadAssigned,
    ClaimSlaBreach,
    CallLogged,
    ReminderDue,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LeadAssigned => "lead_assigned",
            NotificationKind::ClaimSlaBreach => "claim_sla_breach",
            NotificationKind::CallLogged => "call_logged",
            NotificationKind::ReminderDue => "reminder_due",
        }
    }
}

/// A notification row surfaced in the agent's CRM inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InAppNotification {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl InAppNotification {
    pub fn new(agent_id: Uuid, kind: NotificationKind, title: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            lead_id: None,
            kind,
            title,
            message,
            action_url: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_lead(mut self, lead_id: Uuid) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}
