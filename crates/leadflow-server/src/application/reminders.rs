//! Reminder Service (Use Case)
//!
//! Create, snooze, complete and fire follow-up reminders. The service
//! holds the due/snooze/complete state; delivery goes through the
//! dispatcher and is best effort per the engine's contract.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use leadflow::{
    AgentRepository, EngineError, InAppNotification, NotificationDispatcher, NotificationKind,
    Reminder, ReminderRepository, ReminderType,
};

/// Summary of a firing pass over due reminders.
#[derive(Debug, Clone, Copy, Default)]
pub struct FireSummary {
    pub notified: usize,
    pub errors: usize,
}

/// Application service for reminder scheduling
pub struct ReminderService<R, A, N> {
    reminders: Arc<R>,
    agents: Arc<A>,
    notifier: Arc<N>,
}

impl<R, A, N> ReminderService<R, A, N>
where
    R: ReminderRepository,
    A: AgentRepository,
    N: NotificationDispatcher,
{
    pub fn new(reminders: Arc<R>, agents: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            reminders,
            agents,
            notifier,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        agent_id: Uuid,
        lead_id: Option<Uuid>,
        title: String,
        notes: Option<String>,
        reminder_type: ReminderType,
        reminder_datetime: DateTime<Utc>,
        send_email: bool,
        send_chat: bool,
        now: DateTime<Utc>,
    ) -> Result<Reminder, EngineError> {
        let reminder = Reminder::new(
            agent_id,
            lead_id,
            title,
            notes,
            reminder_type,
            reminder_datetime,
            send_email,
            send_chat,
            now,
        )?;
        let saved = self.reminders.insert(&reminder).await?;
        tracing::info!(reminder_id = %saved.id, agent_id = %agent_id, "Reminder created");
        Ok(saved)
    }

    /// Defer the reminder without touching its scheduled time.
    pub async fn snooze(
        &self,
        id: Uuid,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, EngineError> {
        if minutes <= 0 {
            return Err(EngineError::Validation(
                "Snooze minutes must be positive".to_string(),
            ));
        }
        let mut reminder = self
            .reminders
            .find_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Reminder", id))?;
        reminder.snooze(minutes, now);
        self.reminders.save(&reminder).await
    }

    pub async fn complete(&self, id: Uuid, now: DateTime<Utc>) -> Result<Reminder, EngineError> {
        let mut reminder = self
            .reminders
            .find_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Reminder", id))?;
        reminder.complete(now);
        self.reminders.save(&reminder).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), EngineError> {
        if !self.reminders.delete(id).await? {
            return Err(EngineError::not_found("Reminder", id));
        }
        Ok(())
    }

    /// Due reminders at `now`, oldest scheduled first.
    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, EngineError> {
        self.reminders.find_due(now).await
    }

    /// Dispatch notifications for every due reminder that has not been
    /// notified since it last became due. Per-item failures are counted,
    /// the pass always completes.
    pub async fn fire_due(&self, now: DateTime<Utc>) -> Result<FireSummary, EngineError> {
        let due = self.reminders.find_due(now).await?;
        let mut summary = FireSummary::default();

        for reminder in due {
            if !needs_notification(&reminder) {
                continue;
            }
            match self.fire(&reminder, now).await {
                Ok(()) => summary.notified += 1,
                Err(e) => {
                    tracing::warn!(reminder_id = %reminder.id, error = %e, "Reminder notification failed");
                    summary.errors += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn fire(&self, reminder: &Reminder, now: DateTime<Utc>) -> Result<(), EngineError> {
        let agent = self
            .agents
            .find_by_id(reminder.agent_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Agent", reminder.agent_id))?;

        let note = InAppNotification::new(
            agent.id,
            NotificationKind::ReminderDue,
            format!("⏰ Reminder: {}", reminder.title),
            reminder
                .notes
                .clone()
                .unwrap_or_else(|| format!("{} follow-up is due", reminder.reminder_type)),
        );
        let note = match reminder.lead_id {
            Some(lead_id) => note
                .with_lead(lead_id)
                .with_action_url(format!("/crm/agent/leads/{lead_id}")),
            None => note,
        };
        self.notifier.send_in_app(&note).await?;

        if reminder.send_email && agent.email_notifications {
            let subject = format!("Reminder due: {}", reminder.title);
            let body = format!(
                "<p>Hi {},</p><p>Your {} reminder <strong>{}</strong> is due.</p>{}",
                agent.first_name,
                reminder.reminder_type,
                reminder.title,
                reminder
                    .notes
                    .as_deref()
                    .map(|n| format!("<p>{n}</p>"))
                    .unwrap_or_default()
            );
            self.notifier.send_email(&agent.email, &subject, &body).await?;
        }

        if reminder.send_chat && agent.slack_notifications {
            let message = format!("⏰ Reminder due for {}: {}", agent.full_name(), reminder.title);
            self.notifier
                .send_chat(&agent.slack_channel_ids, &message)
                .await?;
        }

        let mut updated = reminder.clone();
        updated.mark_notified(now);
        self.reminders.save(&updated).await?;
        Ok(())
    }
}

/// Skip reminders already notified since they last became due, so a
/// tick does not re-send every still-open reminder.
fn needs_notification(reminder: &Reminder) -> bool {
    let due_since = reminder
        .snoozed_until
        .unwrap_or(reminder.reminder_datetime);
    match reminder.last_notified_at {
        None => true,
        Some(notified_at) => notified_at < due_since,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        InMemoryAgents, InMemoryReminders, RecordingNotifier,
    };
    use chrono::{Duration, TimeZone};
    use leadflow::Language;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn service(
        reminders: Arc<InMemoryReminders>,
        agents: Arc<InMemoryAgents>,
        notifier: Arc<RecordingNotifier>,
    ) -> ReminderService<InMemoryReminders, InMemoryAgents, RecordingNotifier> {
        ReminderService::new(reminders, agents, notifier)
    }

    #[tokio::test]
    async fn test_snoozed_reminder_not_due_until_snooze_elapses() {
        let reminders = Arc::new(InMemoryReminders::default());
        let agents = Arc::new(InMemoryAgents::default());
        let agent = agents.add(vec![Language::En], 5);

        let svc = service(reminders, agents, Arc::new(RecordingNotifier::default()));
        let due_at = t0() + Duration::hours(1);
        let created = svc
            .create(
                agent,
                None,
                "Call Mr. Jensen".to_string(),
                None,
                ReminderType::Callback,
                due_at,
                true,
                false,
                t0(),
            )
            .await
            .unwrap();

        // Due at the scheduled time, snoozed 30 minutes right then
        assert_eq!(svc.due(due_at).await.unwrap().len(), 1);
        svc.snooze(created.id, 30, due_at).await.unwrap();

        assert!(svc.due(due_at).await.unwrap().is_empty());
        assert!(svc
            .due(due_at + Duration::minutes(29))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            svc.due(due_at + Duration::minutes(30)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_completed_reminder_never_due() {
        let reminders = Arc::new(InMemoryReminders::default());
        let agents = Arc::new(InMemoryAgents::default());
        let agent = agents.add(vec![Language::En], 5);

        let svc = service(reminders, agents, Arc::new(RecordingNotifier::default()));
        let created = svc
            .create(
                agent,
                None,
                "Send brochure".to_string(),
                None,
                ReminderType::EmailFollowUp,
                t0(),
                true,
                false,
                t0(),
            )
            .await
            .unwrap();

        svc.complete(created.id, t0()).await.unwrap();
        // Completing again is fine
        let again = svc.complete(created.id, t0() + Duration::hours(1)).await.unwrap();
        assert!(again.is_completed);

        assert!(svc.due(t0() + Duration::days(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fire_due_notifies_once_per_due_cycle() {
        let reminders = Arc::new(InMemoryReminders::default());
        let agents = Arc::new(InMemoryAgents::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let agent = agents.add(vec![Language::En], 5);

        let svc = service(reminders, agents, notifier.clone());
        svc.create(
            agent,
            None,
            "Viewing prep".to_string(),
            None,
            ReminderType::Viewing,
            t0(),
            true,
            false,
            t0() - Duration::hours(1),
        )
        .await
        .unwrap();

        let first = svc.fire_due(t0()).await.unwrap();
        assert_eq!(first.notified, 1);
        assert_eq!(notifier.email_count(), 1);
        assert_eq!(notifier.in_app_count(), 1);

        // Next tick: already notified, nothing fires
        let second = svc.fire_due(t0() + Duration::minutes(5)).await.unwrap();
        assert_eq!(second.notified, 0);
        assert_eq!(notifier.email_count(), 1);
    }

    #[tokio::test]
    async fn test_fire_due_refires_after_snooze_elapses() {
        let reminders = Arc::new(InMemoryReminders::default());
        let agents = Arc::new(InMemoryAgents::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let agent = agents.add(vec![Language::En], 5);

        let svc = service(reminders, agents, notifier.clone());
        let created = svc
            .create(
                agent,
                None,
                "Call back".to_string(),
                None,
                ReminderType::Callback,
                t0(),
                true,
                false,
                t0() - Duration::hours(1),
            )
            .await
            .unwrap();

        svc.fire_due(t0()).await.unwrap();
        svc.snooze(created.id, 30, t0()).await.unwrap();

        // After the snooze elapses it becomes due again and refires
        let later = t0() + Duration::minutes(31);
        let summary = svc.fire_due(later).await.unwrap();
        assert_eq!(summary.notified, 1);
        assert_eq!(notifier.email_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_reminder_is_not_found() {
        let reminders = Arc::new(InMemoryReminders::default());
        let agents = Arc::new(InMemoryAgents::default());
        let svc = service(reminders, agents, Arc::new(RecordingNotifier::default()));

        let err = svc.snooze(Uuid::new_v4(), 10, t0()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }
}
