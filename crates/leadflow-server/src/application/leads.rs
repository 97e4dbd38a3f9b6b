//! Lead Lifecycle Service (Use Case)
//!
//! Registration, round-robin assignment and claiming. The domain state
//! machine defines the legal transitions; this service drives them
//! through the repositories' atomic conditional updates so concurrent
//! triggers resolve to one winner, then fires best-effort notifications
//! after the state has committed.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use leadflow::domain::sla;
use leadflow::{
    Activity, ActivityRepository, Agent, AgentRepository, CursorRepository, EngineError,
    InAppNotification, Language, Lead, LeadPhase, LeadRepository, NotificationDispatcher,
    NotificationKind, SlaConfig,
};

/// Outcome of registering a lead.
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub lead: Lead,
    /// `None` when no agent had capacity; the lead stays unassigned and
    /// is reported, not failed.
    pub assigned_agent: Option<Agent>,
}

/// Application service for lead registration, assignment and claiming
pub struct LeadService<L, A, C, N, Act> {
    leads: Arc<L>,
    agents: Arc<A>,
    cursors: Arc<C>,
    notifier: Arc<N>,
    activities: Arc<Act>,
    config: SlaConfig,
}

impl<L, A, C, N, Act> LeadService<L, A, C, N, Act>
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

    /// Create a lead and immediately run round-robin assignment.
    #[allow(clippy::too_many_arguments)]
    pub async fn register(
        &self,
        first_name: String,
        last_name: String,
        phone_number: String,
        email: Option<String>,
        language: Language,
        lead_source: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<RegisterOutcome, EngineError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(EngineError::Validation(
                "Lead name must not be empty".to_string(),
            ));
        }
        if phone_number.trim().is_empty() {
            return Err(EngineError::Validation(
                "Lead phone number must not be empty".to_string(),
            ));
        }

        let lead = Lead::new(
            first_name.trim().to_string(),
            last_name.trim().to_string(),
            phone_number.trim().to_string(),
            email,
            language,
            lead_source,
            now,
        );
        let lead = self.leads.insert(&lead).await?;
        tracing::info!(lead_id = %lead.id, language = %language, "📥 Lead registered");

        match self.assign(&lead, now).await {
            Ok((assigned, agent)) => Ok(RegisterOutcome {
                lead: assigned,
                assigned_agent: Some(agent),
            }),
            Err(EngineError::NoEligibleAgent { language }) => {
                tracing::warn!(lead_id = %lead.id, language = %language, "No eligible agent, lead stays unassigned");
                Ok(RegisterOutcome {
                    lead,
                    assigned_agent: None,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Round-robin assignment: pick the next eligible agent for the
    /// lead's language, reserve their capacity slot, open the claim
    /// window, advance the cursor.
    pub async fn assign(
        &self,
        lead: &Lead,
        now: DateTime<Utc>,
    ) -> Result<(Lead, Agent), EngineError> {
        if lead.phase() != LeadPhase::Unassigned {
            return Err(EngineError::state_violation(format!(
                "assign: lead {} is {:?}, expected unassigned",
                lead.id,
                lead.phase()
            )));
        }

        let cursor = self.cursors.find_by_language(lead.language).await?;
        let roster = self.agents.find_eligible(lead.language).await?;
        if roster.is_empty() {
            return Err(EngineError::NoEligibleAgent {
                language: lead.language,
            });
        }

        let claim_window = cursor
            .as_ref()
            .map(|c| c.claim_window(&self.config))
            .unwrap_or(self.config.claim_window_minutes);
        let deadline = sla::claim_deadline(now, claim_window);
        let order: Vec<usize> = match &cursor {
            Some(c) => c.rotation_order(roster.len()).collect(),
            None => (0..roster.len()).collect(),
        };

        for idx in order {
            let agent = &roster[idx];

            // Capacity is reserved with an atomic guard; a lost race
            // just moves on to the next agent in rotation.
            if !self.agents.try_reserve_slot(agent.id).await? {
                continue;
            }

            match self.leads.try_assign(lead.id, agent.id, now, deadline).await? {
                Some(assigned) => {
                    // Cursor lands just past the chosen agent
                    let next = ((idx as i32) + 1).rem_euclid(roster.len() as i32);
                    self.advance_cursor(lead.language, &cursor, next).await;
                    self.notify_assignment(&assigned, agent).await;
                    return Ok((assigned, agent.clone()));
                }
                None => {
                    // Another trigger assigned this lead first; give the
                    // slot back and report the conflict.
                    self.agents.release_slot(agent.id).await?;
                    return Err(EngineError::state_violation(format!(
                        "assign: lead {} was assigned concurrently",
                        lead.id
                    )));
                }
            }
        }

        Err(EngineError::NoEligibleAgent {
            language: lead.language,
        })
    }

    /// Agent acknowledges an assigned lead. At-most-one-winner: the
    /// conditional update only succeeds while the lead is still awaiting
    /// claim and still assigned to this agent.
    pub async fn claim(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Lead, EngineError> {
        let lead = self
            .leads
            .find_by_id(lead_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Lead", lead_id))?;

        // Validate against the state machine first for a precise error;
        // the conditional update below is what makes it race-safe.
        let mut preview = lead.clone();
        preview.claim(agent_id, now, &self.config)?;

        let deadline = sla::contact_deadline(now, self.config.contact_window_minutes);
        let claimed = self
            .leads
            .try_claim(lead_id, agent_id, now, deadline)
            .await?
            .ok_or_else(|| {
                EngineError::state_violation(format!(
                    "claim: lead {lead_id} was claimed concurrently"
                ))
            })?;

        tracing::info!(lead_id = %lead_id, agent_id = %agent_id, "✅ Lead claimed");
        Ok(claimed)
    }

    async fn advance_cursor(
        &self,
        language: Language,
        cursor: &Option<leadflow::RoundRobinCursor>,
        next: i32,
    ) {
        let Some(cursor) = cursor else { return };
        match self
            .cursors
            .try_advance(language, cursor.rotation_cursor, next)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                // A concurrent assignment advanced it first. The
                // assignment stands; drift is tolerated.
                tracing::debug!(language = %language, "Cursor advance lost a race");
            }
            Err(e) => {
                tracing::warn!(language = %language, error = %e, "Cursor advance failed");
            }
        }
    }

    /// Best-effort post-commit notifications: in-app always, email when
    /// the agent has it enabled. Failures are logged, never propagated.
    async fn notify_assignment(&self, lead: &Lead, agent: &Agent) {
        let title = format!(
            "{} New {} Lead Assigned",
            lead.language.flag(),
            lead.language.as_str().to_uppercase()
        );
        let message = format!(
            "{} - claim within {} minutes",
            lead.full_name(),
            self.config.claim_window_minutes
        );
        let note = InAppNotification::new(agent.id, NotificationKind::LeadAssigned, title, message)
            .with_lead(lead.id)
            .with_action_url(format!("/crm/agent/leads/{}/claim", lead.id));

        if let Err(e) = self.notifier.send_in_app(&note).await {
            tracing::warn!(lead_id = %lead.id, error = %e, "In-app assignment notification failed");
        }

        if agent.email_notifications {
            let subject = format!("New lead: {} ({})", lead.full_name(), lead.language);
            let body = format!(
                "<p>Hi {},</p><p>A new {} lead was assigned to you: <strong>{}</strong>.</p>\
                 <p>Please claim it within {} minutes.</p>",
                agent.first_name,
                lead.language.as_str().to_uppercase(),
                lead.full_name(),
                self.config.claim_window_minutes
            );
            if let Err(e) = self.notifier.send_email(&agent.email, &subject, &body).await {
                tracing::warn!(lead_id = %lead.id, error = %e, "Assignment email failed");
            }
        }

        let activity = Activity::note(
            Some(lead.id),
            Some(agent.id),
            format!("Lead auto-assigned to {} via round-robin", agent.full_name()),
            Utc::now(),
        );
        if let Err(e) = self.activities.insert(&activity).await {
            tracing::warn!(lead_id = %lead.id, error = %e, "Assignment activity log failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        InMemoryActivities, InMemoryAgents, InMemoryCursors, InMemoryLeads, RecordingNotifier,
    };
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn service(
        leads: Arc<InMemoryLeads>,
        agents: Arc<InMemoryAgents>,
        cursors: Arc<InMemoryCursors>,
    ) -> LeadService<
        InMemoryLeads,
        InMemoryAgents,
        InMemoryCursors,
        RecordingNotifier,
        InMemoryActivities,
    > {
        LeadService::new(
            leads,
            agents,
            cursors,
            Arc::new(RecordingNotifier::default()),
            Arc::new(InMemoryActivities::default()),
            SlaConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_register_assigns_and_opens_claim_window() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        let agent = agents.add(vec![Language::En], 1);
        cursors.add(Language::En, 0, None);

        let svc = service(leads.clone(), agents.clone(), cursors);
        let outcome = svc
            .register(
                "John".to_string(),
                "Doe".to_string(),
                "+44 7700 900123".to_string(),
                None,
                Language::En,
                Some("Website".to_string()),
                t0(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.assigned_agent.as_ref().unwrap().id, agent);
        let lead = outcome.lead;
        assert_eq!(lead.phase(), LeadPhase::AwaitingClaim);
        assert_eq!(
            lead.claim_timer_expires_at,
            Some(t0() + chrono::Duration::minutes(5))
        );
        assert_eq!(agents.lead_count(agent), 1);
    }

    #[tokio::test]
    async fn test_register_without_capacity_leaves_lead_unassigned() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        // Fluent German agent, but the lead speaks French
        agents.add(vec![Language::De], 1);
        cursors.add(Language::Fr, 0, None);

        let svc = service(leads.clone(), agents, cursors);
        let outcome = svc
            .register(
                "Marie".to_string(),
                "Durand".to_string(),
                "+33 6 12 34 56 78".to_string(),
                None,
                Language::Fr,
                None,
                t0(),
            )
            .await
            .unwrap();

        assert!(outcome.assigned_agent.is_none());
        assert_eq!(outcome.lead.phase(), LeadPhase::Unassigned);
    }

    #[tokio::test]
    async fn test_round_robin_cycles_through_all_agents() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        let a = agents.add(vec![Language::En], 10);
        let b = agents.add(vec![Language::En], 10);
        let c = agents.add(vec![Language::En], 10);
        cursors.add(Language::En, 0, None);

        let svc = service(leads.clone(), agents.clone(), cursors);
        let mut picked = Vec::new();
        for i in 0..6 {
            let outcome = svc
                .register(
                    format!("Lead{i}"),
                    "Test".to_string(),
                    format!("+44 7700 9001{i:02}"),
                    None,
                    Language::En,
                    None,
                    t0(),
                )
                .await
                .unwrap();
            picked.push(outcome.assigned_agent.unwrap().id);
        }

        // Each agent seen exactly once per full cycle
        let mut sorted_roster = vec![a, b, c];
        sorted_roster.sort();
        let mut first_cycle = picked[..3].to_vec();
        first_cycle.sort();
        assert_eq!(first_cycle, sorted_roster);
        // Second cycle repeats the same rotation order
        assert_eq!(picked[3..6], picked[..3]);
    }

    #[tokio::test]
    async fn test_claim_happy_path() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        let agent = agents.add(vec![Language::En], 1);
        cursors.add(Language::En, 0, None);

        let svc = service(leads.clone(), agents, cursors);
        let outcome = svc
            .register(
                "John".to_string(),
                "Doe".to_string(),
                "600111222".to_string(),
                None,
                Language::En,
                None,
                t0(),
            )
            .await
            .unwrap();

        let claim_at = t0() + chrono::Duration::minutes(2);
        let claimed = svc.claim(outcome.lead.id, agent, claim_at).await.unwrap();

        assert_eq!(claimed.phase(), LeadPhase::AwaitingContact);
        assert!(claimed.claim_timer_expires_at.is_none());
        assert!(claimed.contact_timer_expires_at.is_some());
        assert!(!claimed.claim_sla_breached);
    }

    #[tokio::test]
    async fn test_second_claim_gets_state_violation() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        let agent = agents.add(vec![Language::En], 1);
        cursors.add(Language::En, 0, None);

        let svc = service(leads.clone(), agents, cursors);
        let outcome = svc
            .register(
                "John".to_string(),
                "Doe".to_string(),
                "600111222".to_string(),
                None,
                Language::En,
                None,
                t0(),
            )
            .await
            .unwrap();
        let lead_id = outcome.lead.id;

        svc.claim(lead_id, agent, t0()).await.unwrap();
        let err = svc.claim(lead_id, agent, t0()).await.unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
    }

    #[tokio::test]
    async fn test_capacity_guard_moves_to_next_agent() {
        let leads = Arc::new(InMemoryLeads::default());
        let agents = Arc::new(InMemoryAgents::default());
        let cursors = Arc::new(InMemoryCursors::default());
        let a = agents.add(vec![Language::En], 1);
        let b = agents.add(vec![Language::En], 2);
        cursors.add(Language::En, 0, None);

        let svc = service(leads.clone(), agents.clone(), cursors);
        let mut assigned = Vec::new();
        for i in 0..3 {
            let outcome = svc
                .register(
                    format!("Lead{i}"),
                    "Test".to_string(),
                    format!("60011122{i}"),
                    None,
                    Language::En,
                    None,
                    t0(),
                )
                .await
                .unwrap();
            assigned.push(outcome.assigned_agent.unwrap().id);
        }

        // Capacity 1 + 2: nobody exceeds max_active_leads
        assert_eq!(assigned.iter().filter(|id| **id == a).count(), 1);
        assert_eq!(assigned.iter().filter(|id| **id == b).count(), 2);

        // Fourth lead finds nobody
        let outcome = svc
            .register(
                "Late".to_string(),
                "Lead".to_string(),
                "600999888".to_string(),
                None,
                Language::En,
                None,
                t0(),
            )
            .await
            .unwrap();
        assert!(outcome.assigned_agent.is_none());
    }
}
