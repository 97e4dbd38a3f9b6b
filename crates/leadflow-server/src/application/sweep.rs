//! Claim-Window Sweeper (Use Case)
//!
//! Periodic job that escalates breached claim windows: flags the lead,
//! notifies the language's fallback admin by email and in-app, and
//! leaves an audit note. Each lead is processed independently; a bad
//! record is counted and skipped, never allowed to abort the batch.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use leadflow::{
    Activity, ActivityRepository, Agent, AgentRepository, CursorRepository, EngineError,
    InAppNotification, Lead, LeadRepository, NotificationDispatcher, NotificationKind, SlaConfig,
};

/// Result summary returned to the trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepSummary {
    pub processed: usize,
    pub errors: usize,
    pub total: usize,
}

/// Application service for the claim-window sweep
pub struct SweepService<L, A, C, N, Act> {
    leads: Arc<L>,
    agents: Arc<A>,
    cursors: Arc<C>,
    notifier: Arc<N>,
    activities: Arc<Act>,
    config: SlaConfig,
}

impl<L, A, C, N, Act> SweepService<L, A, C, N, Act>
where
    L: LeadRepository,
    A: AgentRepository,
    C: CursorRepository,
    N: NotificationDispatcher,
    Act: ActivityRepository,
{
    pub fn new(
        leads: Arc<L>,
        agents: Arc<A>,
        cursors: Arc<C>,
        notifier: Arc<N>,
        activities: Arc<Act>,
        config: SlaConfig,
    ) -> Self {
        Self {
            leads,
            agents,
            cursors,
            notifier,
            activities,
            config,
        }
    }

    /// Scan for breached claim windows and escalate each one.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepSummary, EngineError> {
        let expired = self.leads.find_claim_breaches(now).await?;
        if expired.is_empty() {
            tracing::info!("Sweep found no expired claim windows");
            return Ok(SweepSummary::default());
        }

        tracing::info!(count = expired.len(), "⏰ Sweep found expired claim windows");

        let mut summary = SweepSummary {
            total: expired.len(),
            ..Default::default()
        };

        for lead in expired {
            match self.escalate(&lead, now).await {
                Ok(true) => summary.processed += 1,
                // Another sweep instance flagged it first
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(lead_id = %lead.id, error = %e, "Sweep escalation failed");
                    summary.errors += 1;
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            errors = summary.errors,
            "Sweep complete"
        );
        Ok(summary)
    }

    /// Escalate one lead. The breach flag commits first; everything
    /// after it is delivery, and a delivery failure counts as an error
    /// without unflagging the lead.
    async fn escalate(&self, lead: &Lead, now: DateTime<Utc>) -> Result<bool, EngineError> {
        if !self.leads.try_mark_claim_breached(lead.id, now).await? {
            return Ok(false);
        }

        let admin = self.fallback_admin(lead).await?;
        let elapsed_minutes = (now - lead.created_at).num_minutes();

        let Some(admin) = admin else {
            // Breach is flagged but nobody to tell: counted as a
            // failure so it shows up in the summary.
            return Err(EngineError::NotificationDelivery(format!(
                "No fallback admin configured for language {}",
                lead.language
            )));
        };

        let subject = format!(
            "🚨 Lead Unclaimed - {} ({})",
            lead.full_name(),
            lead.language.as_str().to_uppercase()
        );
        let body = escalation_email_body(lead, &admin, elapsed_minutes, self.config.claim_window_minutes);
        if let Err(e) = self.notifier.send_email(&admin.email, &subject, &body).await {
            tracing::error!(lead_id = %lead.id, error = %e, "Escalation email failed");
            return Err(e);
        }

        let note = InAppNotification::new(
            admin.id,
            NotificationKind::ClaimSlaBreach,
            "🚨 Lead Unclaimed - Claim Window Expired".to_string(),
            format!(
                "{} ({}) went unclaimed after {} minutes - requires reassignment",
                lead.full_name(),
                lead.language.as_str().to_uppercase(),
                self.config.claim_window_minutes
            ),
        )
        .with_lead(lead.id)
        .with_action_url("/crm/admin/leads");
        if let Err(e) = self.notifier.send_in_app(&note).await {
            tracing::error!(lead_id = %lead.id, error = %e, "Escalation notification failed");
            return Err(e);
        }

        let activity = Activity::note(
            Some(lead.id),
            Some(admin.id),
            format!(
                "Claim SLA breach: claim window expired after {} minutes with no agent claiming. Admin notified for manual reassignment.",
                self.config.claim_window_minutes
            ),
            now,
        );
        if let Err(e) = self.activities.insert(&activity).await {
            tracing::warn!(lead_id = %lead.id, error = %e, "Breach audit entry failed");
        }

        tracing::info!(lead_id = %lead.id, admin = %admin.email, "Escalated unclaimed lead");
        Ok(true)
    }

    async fn fallback_admin(&self, lead: &Lead) -> Result<Option<Agent>, EngineError> {
        let Some(cursor) = self.cursors.find_by_language(lead.language).await? else {
            return Ok(None);
        };
        let Some(admin_id) = cursor.fallback_admin_id else {
            return Ok(None);
        };
        self.agents.find_by_id(admin_id).await
    }
}

fn escalation_email_body(
    lead: &Lead,
    admin: &Agent,
    elapsed_minutes: i64,
    claim_window_minutes: i64,
) -> String {
    format!(
        r#"<p>Hi {admin_name},</p>
<p>A lead went <strong>unclaimed</strong> after the claim window expired and requires your immediate attention.</p>
<h3>Lead Details</h3>
<ul>
  <li>Name: {name}</li>
  <li>Phone: {phone}</li>
  <li>Email: {email}</li>
  <li>Language: {language}</li>
  <li>Source: {source}</li>
  <li>Created: {elapsed_minutes} minutes ago</li>
</ul>
<p>The claim window expired after {claim_window_minutes} minutes and no agent claimed this lead.
Please manually reassign it to an available agent.</p>"#,
        admin_name = admin.first_name,
        name = lead.full_name(),
        phone = lead.phone_number,
        email = lead.email.as_deref().unwrap_or("Not provided"),
        language = lead.language.as_str().to_uppercase(),
        source = lead.lead_source.as_deref().unwrap_or("Unknown"),
    )
}
