//! Reminder - Scheduled Follow-Up
//!
//! Independent of lead assignment: an agent's own callback/follow-up
//! schedule with snooze and completion state. Delivery of due
//! notifications goes through the dispatcher port; this entity holds
//! only the due/snooze/complete logic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::EngineError;
use crate::domain::value_objects::ReminderType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub title: String,
    pub notes: Option<String>,
    pub reminder_type: ReminderType,
    pub reminder_datetime: DateTime<Utc>,
    /// Effective next-check time when present and in the future;
    /// snoozing never rewrites `reminder_datetime`.
    pub snoozed_until: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub send_email: bool,
    pub send_chat: bool,
    /// Stamped after a due notification goes out so the firing pass
    /// does not re-send on every tick.
    pub last_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Create a reminder, validating the title and schedule.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_id: Uuid,
        lead_id: Option<Uuid>,
        title: String,
        notes: Option<String>,
        reminder_type: ReminderType,
        reminder_datetime: DateTime<Utc>,
        send_email: bool,
        send_chat: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if title.trim().is_empty() {
            return Err(EngineError::Validation(
                "Reminder title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            agent_id,
            lead_id,
            title,
            notes,
            reminder_type,
            reminder_datetime,
            snoozed_until: None,
            is_completed: false,
            completed_at: None,
            send_email,
            send_chat,
            last_notified_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Push the effective due time `minutes` into the future.
    pub fn snooze(&mut self, minutes: i64, now: DateTime<Utc>) {
        self.snoozed_until = Some(now + Duration::minutes(minutes));
        self.updated_at = now;
    }

    /// Mark completed. Idempotent: completing twice keeps the original
    /// completion time.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if self.is_completed {
            return;
        }
        self.is_completed = true;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Due iff not completed, past its scheduled time, and not snoozed
    /// into the future.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        if self.is_completed || self.reminder_datetime > now {
            return false;
        }
        match self.snoozed_until {
            Some(until) => until <= now,
            None => true,
        }
    }

    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.last_notified_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn reminder(due: DateTime<Utc>) -> Reminder {
        Reminder::new(
            Uuid::new_v4(),
            None,
            "Call back about the villa".to_string(),
            None,
            ReminderType::Callback,
            due,
            true,
            false,
            t0(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = Reminder::new(
            Uuid::new_v4(),
            None,
            "   ".to_string(),
            None,
            ReminderType::Callback,
            t0(),
            true,
            false,
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_due_only_after_scheduled_time() {
        let r = reminder(t0() + Duration::hours(1));
        assert!(!r.is_due(t0()));
        assert!(r.is_due(t0() + Duration::hours(1)));
    }

    #[test]
    fn test_snooze_defers_due_without_rescheduling() {
        let due = t0() + Duration::hours(1);
        let mut r = reminder(due);

        // Snoozed by 30 minutes right when it comes due
        r.snooze(30, due);
        assert_eq!(r.reminder_datetime, due);
        assert!(!r.is_due(due));
        assert!(!r.is_due(due + Duration::minutes(29)));
        assert!(r.is_due(due + Duration::minutes(30)));
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut r = reminder(t0());
        r.complete(t0() + Duration::minutes(1));
        let completed_at = r.completed_at;

        r.complete(t0() + Duration::minutes(9));
        assert_eq!(r.completed_at, completed_at);
        assert!(!r.is_due(t0() + Duration::hours(2)));
    }
}
