//! Agent - Staffed CRM User

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Language;

/// A sales agent leads are distributed to.
///
/// `current_lead_count` is a capacity counter maintained by the
/// assigner; the store updates it atomically with the capacity guard so
/// concurrent assignment bursts cannot push an agent past
/// `max_active_leads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub languages: Vec<Language>,
    pub max_active_leads: i32,
    pub current_lead_count: i32,
    pub is_active: bool,
    pub accepts_new_leads: bool,
    /// Per-channel notification switches
    pub email_notifications: bool,
    pub slack_notifications: bool,
    pub slack_channel_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn speaks(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    pub fn has_capacity(&self) -> bool {
        self.current_lead_count < self.max_active_leads
    }

    /// Eligible to receive a new lead in the given language.
    pub fn is_eligible(&self, language: Language) -> bool {
        self.is_active && self.accepts_new_leads && self.speaks(language) && self.has_capacity()
    }
}
