//! Reminder DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use leadflow::Reminder;

/// Create reminder request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReminderRequest {
    pub agent_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub title: String,
    pub notes: Option<String>,
    /// callback, email_follow_up, meeting, viewing, other
    pub reminder_type: String,
    pub reminder_datetime: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub send_email: bool,
    #[serde(default)]
    pub send_chat: bool,
}

fn default_true() -> bool {
    true
}

/// Snooze reminder request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SnoozeReminderRequest {
    pub minutes: i64,
}

/// Reminder response
#[derive(Debug, Serialize, ToSchema)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub title: String,
    pub notes: Option<String>,
    pub reminder_type: String,
    pub reminder_datetime: DateTime<Utc>,
    pub snoozed_until: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub send_email: bool,
    pub send_chat: bool,
    pub created_at: DateTime<Utc>,
}

impl ReminderResponse {
    pub fn from_domain(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            agent_id: reminder.agent_id,
            lead_id: reminder.lead_id,
            title: reminder.title,
            notes: reminder.notes,
            reminder_type: reminder.reminder_type.as_str().to_string(),
            reminder_datetime: reminder.reminder_datetime,
            snoozed_until: reminder.snoozed_until,
            is_completed: reminder.is_completed,
            completed_at: reminder.completed_at,
            send_email: reminder.send_email,
            send_chat: reminder.send_chat,
            created_at: reminder.created_at,
        }
    }
}

/// Firing pass response
#[derive(Debug, Serialize, ToSchema)]
pub struct FireRemindersResponse {
    pub notified: usize,
    pub errors: usize,
}
