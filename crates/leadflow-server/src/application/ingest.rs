//! Call Ingestion Service (Use Case)
//!
//! Webhook entry point for the telephony provider. Delivery is
//! at-least-once, so everything here is shaped around idempotency: a
//! replayed call id is a success no-op, an unattributable call is a
//! success no-op, and once the call row is written no later step can
//! lose it. The provider always gets a success response; internal
//! failures are logged, not surfaced.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use leadflow::domain::matcher;
use leadflow::domain::value_objects::phone;
use leadflow::{
    AgentRepository, CallDirection, CallEvent, CallEventRepository, CallInsert, EngineError,
    InAppNotification, LeadRepository, NotificationDispatcher, NotificationKind,
};

/// Parsed provider payload, validated by the route layer.
#[derive(Debug, Clone)]
pub struct InboundCall {
    pub provider_call_id: String,
    pub agent_email: Option<String>,
    pub agent_phone: Option<String>,
    pub phone_number: Option<String>,
    pub direction: Option<CallDirection>,
    pub answered: bool,
    pub duration_seconds: i32,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub raw_payload: serde_json::Value,
}

/// What the webhook response reports back to the provider.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub duplicate: bool,
    pub agent_matched: bool,
    pub lead_matched: bool,
    pub call_id: Option<Uuid>,
}

/// Application service for call ingestion
pub struct IngestService<L, A, C, N> {
    leads: Arc<L>,
    agents: Arc<A>,
    calls: Arc<C>,
    notifier: Arc<N>,
}

impl<L, A, C, N> IngestService<L, A, C, N>
where
    L: LeadRepository,
    A: AgentRepository,
    C: CallEventRepository,
    N: NotificationDispatcher,
{
    pub fn new(leads: Arc<L>, agents: Arc<A>, calls: Arc<C>, notifier: Arc<N>) -> Self {
        Self {
            leads,
            agents,
            calls,
            notifier,
        }
    }

    pub async fn ingest(
        &self,
        call: InboundCall,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome, EngineError> {
        if call.provider_call_id.trim().is_empty() {
            return Err(EngineError::Validation(
                "Missing provider call id".to_string(),
            ));
        }

        // Agent match is required: an unattributable call is a terminal
        // no-op, reported as success so the provider stops retrying.
        let agent = self
            .agents
            .find_by_email_or_phone(call.agent_email.as_deref(), call.agent_phone.as_deref())
            .await?;
        let Some(agent) = agent else {
            tracing::warn!(
                provider_call_id = %call.provider_call_id,
                email = ?call.agent_email,
                "Call agent not matched"
            );
            return Ok(IngestOutcome::default());
        };

        // Lead match is best effort via the phone suffix heuristic.
        let lead = match call.phone_number.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let key = phone::normalize(raw);
                let candidates = self.leads.find_by_phone_suffix(&key.suffix_key).await?;
                matcher::best_match(&candidates, &key)
            }
            _ => None,
        };

        // The call log is the source of truth; it is written before any
        // further side effects and never rolled back by them.
        let event = CallEvent {
            id: Uuid::new_v4(),
            provider_call_id: call.provider_call_id.clone(),
            agent_id: agent.id,
            lead_id: lead.as_ref().map(|l| l.id),
            direction: call.direction,
            answered: call.answered,
            duration_seconds: call.duration_seconds,
            phone_number: call.phone_number.clone(),
            recording_url: call.recording_url.clone(),
            started_at: call.started_at,
            ended_at: call.ended_at,
            metadata: call.raw_payload.clone(),
            created_at: call.started_at.unwrap_or(now),
        };

        let recorded = match self.calls.record(&event).await? {
            CallInsert::Recorded(recorded) => recorded,
            CallInsert::Duplicate => {
                tracing::info!(provider_call_id = %call.provider_call_id, "Duplicate call delivery, already logged");
                return Ok(IngestOutcome {
                    duplicate: true,
                    agent_matched: true,
                    lead_matched: lead.is_some(),
                    call_id: None,
                });
            }
        };

        // First verified contact for the matched lead; an already
        // contacted lead makes this a no-op, not a failure.
        if let Some(lead) = &lead {
            let contact_at = call.started_at.unwrap_or(now);
            match self.leads.try_record_contact(lead.id, contact_at).await {
                Ok(Some(_)) => {
                    tracing::info!(lead_id = %lead.id, "📞 First contact recorded from call");
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(lead_id = %lead.id, error = %e, "Contact update failed, call remains logged");
                }
            }

            let direction = recorded.direction.map(|d| d.as_str()).unwrap_or("logged");
            let message = match recorded.duration_label().as_str() {
                "" => format!("Your {direction} call with {} was recorded", lead.full_name()),
                label => format!(
                    "Your {label} {direction} call with {} was recorded",
                    lead.full_name()
                ),
            };
            let note = InAppNotification::new(
                agent.id,
                NotificationKind::CallLogged,
                "📞 Call Automatically Logged".to_string(),
                message,
            )
            .with_lead(lead.id)
            .with_action_url(format!("/crm/agent/leads/{}", lead.id));

            if let Err(e) = self.notifier.send_in_app(&note).await {
                tracing::warn!(lead_id = %lead.id, error = %e, "Call notification failed");
            }
        }

        Ok(IngestOutcome {
            duplicate: false,
            agent_matched: true,
            lead_matched: lead.is_some(),
            call_id: Some(recorded.id),
        })
    }
}
