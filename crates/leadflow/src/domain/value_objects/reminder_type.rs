//! Reminder Type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of follow-up a reminder schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Callback,
    EmailFollowUp,
    Meeting,
    Viewing,
    Other,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::Callback => "callback",
            ReminderType::EmailFollowUp => "email_follow_up",
            ReminderType::Meeting => "meeting",
            ReminderType::Viewing => "viewing",
            ReminderType::Other => "other",
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReminderType {
    type Err = crate::domain::errors::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "callback" => Ok(ReminderType::Callback),
            "email_follow_up" => Ok(ReminderType::EmailFollowUp),
            "meeting" => Ok(ReminderType::Meeting),
            "viewing" => Ok(ReminderType::Viewing),
            "other" => Ok(ReminderType::Other),
            other => Err(crate::domain::errors::EngineError::Validation(format!(
                "Unknown reminder type: {other}"
            ))),
        }
    }
}
