//! Reminder Repository Port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{EngineError, Reminder};

#[async_trait]
pub trait ReminderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reminder>, EngineError>;

    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, EngineError>;

    async fn save(&self, reminder: &Reminder) -> Result<Reminder, EngineError>;

    async fn delete(&self, id: Uuid) -> Result<bool, EngineError>;

    /// Reminders due at `now`: not completed, scheduled time passed,
    /// snooze (if any) elapsed. Ordered by `reminder_datetime`
    /// ascending, ties broken by id, so repeated calls walk the same
    /// stable sequence.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, EngineError>;
}
