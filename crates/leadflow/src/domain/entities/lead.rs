//! Lead - Inbound Sales Inquiry
//!
//! Owns the lifecycle fields (assignment, claim, contact, breach flags)
//! and the legal transitions between them. The phase is derived from the
//! nullable timestamp fields, never stored; all reads and writes of those
//! fields go through the transition methods here so the invariants hold
//! in one place instead of being scattered across callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::EngineError;
use crate::domain::sla::{self, SlaConfig};
use crate::domain::value_objects::Language;

/// Lifecycle phase, derived from the lead's fields.
///
/// Invariants: `claim_timer_expires_at` is set iff the phase is
/// `AwaitingClaim`; `contact_timer_expires_at` is set iff the phase is
/// `AwaitingContact`. The `claim_sla_breached` flag is orthogonal and
/// informational, it never locks a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadPhase {
    Unassigned,
    AwaitingClaim,
    AwaitingContact,
    Contacted,
}

/// Outcome of a contact recording, distinguishing the idempotent replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Recorded,
    AlreadyContacted,
}

/// A sales inquiry flowing through assignment, claim and first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub language: Language,
    pub lead_source: Option<String>,

    pub assigned_agent_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,

    pub claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    pub claim_timer_expires_at: Option<DateTime<Utc>>,
    pub claim_sla_breached: bool,

    pub first_contact_at: Option<DateTime<Utc>>,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub contact_timer_expires_at: Option<DateTime<Utc>>,
    pub contact_sla_breached: bool,

    /// Leads are never physically deleted, only archived.
    pub archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Create a fresh unassigned lead.
    pub fn new(
        first_name: String,
        last_name: String,
        phone_number: String,
        email: Option<String>,
        language: Language,
        lead_source: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            phone_number,
            email,
            language,
            lead_source,
            assigned_agent_id: None,
            assigned_at: None,
            claimed: false,
            claimed_at: None,
            claim_timer_expires_at: None,
            claim_sla_breached: false,
            first_contact_at: None,
            last_contact_at: None,
            contact_timer_expires_at: None,
            contact_sla_breached: false,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Derive the lifecycle phase from the lead's fields.
    pub fn phase(&self) -> LeadPhase {
        if self.first_contact_at.is_some() {
            LeadPhase::Contacted
        } else if self.claimed {
            LeadPhase::AwaitingContact
        } else if self.assigned_agent_id.is_some() {
            LeadPhase::AwaitingClaim
        } else {
            LeadPhase::Unassigned
        }
    }

    /// Assign the lead to an agent and open the claim window.
    ///
    /// Legal only from `Unassigned`.
    pub fn assign(
        &mut self,
        agent_id: Uuid,
        now: DateTime<Utc>,
        claim_window_minutes: i64,
    ) -> Result<(), EngineError> {
        if self.phase() != LeadPhase::Unassigned {
            return Err(EngineError::state_violation(format!(
                "assign: lead {} is {:?}, expected unassigned",
                self.id,
                self.phase()
            )));
        }
        self.assigned_agent_id = Some(agent_id);
        self.assigned_at = Some(now);
        self.claim_timer_expires_at = Some(sla::claim_deadline(now, claim_window_minutes));
        self.updated_at = now;
        Ok(())
    }

    /// Claim the lead: acknowledge the assignment and open the contact
    /// window.
    ///
    /// Legal only from `AwaitingClaim`, and only by the assigned agent.
    /// A claim after the window expired is still accepted; the breach
    /// flag is informational, not a lock.
    pub fn claim(
        &mut self,
        agent_id: Uuid,
        now: DateTime<Utc>,
        config: &SlaConfig,
    ) -> Result<(), EngineError> {
        if self.phase() != LeadPhase::AwaitingClaim {
            return Err(EngineError::state_violation(format!(
                "claim: lead {} is {:?}, expected awaiting_claim",
                self.id,
                self.phase()
            )));
        }
        if self.assigned_agent_id != Some(agent_id) {
            return Err(EngineError::state_violation(format!(
                "claim: lead {} is not assigned to agent {agent_id}",
                self.id
            )));
        }
        self.claimed = true;
        self.claimed_at = Some(now);
        self.claim_timer_expires_at = None;
        self.contact_timer_expires_at =
            Some(sla::contact_deadline(now, config.contact_window_minutes));
        self.updated_at = now;
        Ok(())
    }

    /// Record the first verified contact (e.g. a logged call).
    ///
    /// Legal from `AwaitingContact`, and idempotently from `Contacted`:
    /// a lead that already has `first_contact_at` is left unchanged,
    /// which absorbs duplicate webhook delivery and re-contacts.
    pub fn record_contact(&mut self, at: DateTime<Utc>) -> Result<ContactOutcome, EngineError> {
        match self.phase() {
            LeadPhase::Contacted => Ok(ContactOutcome::AlreadyContacted),
            LeadPhase::AwaitingContact => {
                self.first_contact_at = Some(at);
                self.last_contact_at = Some(at);
                self.contact_timer_expires_at = None;
                self.contact_sla_breached = false;
                self.updated_at = at;
                Ok(ContactOutcome::Recorded)
            }
            phase => Err(EngineError::state_violation(format!(
                "record_contact: lead {} is {phase:?}, expected awaiting_contact",
                self.id
            ))),
        }
    }

    /// Mark the claim window as breached.
    ///
    /// Legal only while `AwaitingClaim`, strictly after the deadline,
    /// and only once. The lead stays assigned and claimable; escalation
    /// routes a human follow-up, it does not unassign.
    pub fn breach_claim(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.phase() != LeadPhase::AwaitingClaim {
            return Err(EngineError::state_violation(format!(
                "breach_claim: lead {} is {:?}, expected awaiting_claim",
                self.id,
                self.phase()
            )));
        }
        if self.claim_sla_breached {
            return Err(EngineError::state_violation(format!(
                "breach_claim: lead {} already marked breached",
                self.id
            )));
        }
        let deadline = self.claim_timer_expires_at.ok_or_else(|| {
            EngineError::state_violation(format!("breach_claim: lead {} has no deadline", self.id))
        })?;
        if !sla::is_breached(deadline, now) {
            return Err(EngineError::state_violation(format!(
                "breach_claim: lead {} deadline {deadline} not yet passed",
                self.id
            )));
        }
        self.claim_sla_breached = true;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn config() -> SlaConfig {
        SlaConfig::default()
    }

    fn new_lead() -> Lead {
        Lead::new(
            "Anna".to_string(),
            "Virtanen".to_string(),
            "+358 40 123 4567".to_string(),
            Some("anna@example.com".to_string()),
            Language::Fi,
            Some("Website".to_string()),
            t0(),
        )
    }

    #[test]
    fn test_new_lead_is_unassigned() {
        let lead = new_lead();
        assert_eq!(lead.phase(), LeadPhase::Unassigned);
        assert!(lead.claim_timer_expires_at.is_none());
        assert!(lead.contact_timer_expires_at.is_none());
    }

    #[test]
    fn test_assign_opens_claim_window() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();
        lead.assign(agent, t0(), 5).unwrap();

        assert_eq!(lead.phase(), LeadPhase::AwaitingClaim);
        assert_eq!(lead.assigned_agent_id, Some(agent));
        assert_eq!(lead.claim_timer_expires_at, Some(t0() + Duration::minutes(5)));
        assert!(lead.contact_timer_expires_at.is_none());
    }

    #[test]
    fn test_assign_twice_rejected_without_mutation() {
        let mut lead = new_lead();
        let first = Uuid::new_v4();
        lead.assign(first, t0(), 5).unwrap();

        let before = lead.clone();
        let err = lead.assign(Uuid::new_v4(), t0(), 5).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
        assert_eq!(lead.assigned_agent_id, before.assigned_agent_id);
        assert_eq!(lead.claim_timer_expires_at, before.claim_timer_expires_at);
    }

    #[test]
    fn test_claim_clears_claim_deadline_and_opens_contact_window() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();
        lead.assign(agent, t0(), 5).unwrap();

        let claim_at = t0() + Duration::minutes(2);
        lead.claim(agent, claim_at, &config()).unwrap();

        assert_eq!(lead.phase(), LeadPhase::AwaitingContact);
        assert!(lead.claim_timer_expires_at.is_none());
        assert_eq!(
            lead.contact_timer_expires_at,
            Some(claim_at + Duration::minutes(config().contact_window_minutes))
        );
        assert!(!lead.claim_sla_breached);
    }

    #[test]
    fn test_claim_by_wrong_agent_rejected() {
        let mut lead = new_lead();
        lead.assign(Uuid::new_v4(), t0(), 5).unwrap();

        let err = lead.claim(Uuid::new_v4(), t0(), &config()).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
        assert_eq!(lead.phase(), LeadPhase::AwaitingClaim);
    }

    #[test]
    fn test_second_claim_conflicts() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();
        lead.assign(agent, t0(), 5).unwrap();
        lead.claim(agent, t0(), &config()).unwrap();

        let err = lead.claim(agent, t0(), &config()).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
    }

    #[test]
    fn test_late_claim_still_accepted_after_breach() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();
        lead.assign(agent, t0(), 5).unwrap();
        lead.breach_claim(t0() + Duration::minutes(6)).unwrap();

        lead.claim(agent, t0() + Duration::minutes(10), &config()).unwrap();
        assert_eq!(lead.phase(), LeadPhase::AwaitingContact);
        // Breach flag stays for reporting
        assert!(lead.claim_sla_breached);
    }

    #[test]
    fn test_record_contact_is_idempotent() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();
        lead.assign(agent, t0(), 5).unwrap();
        lead.claim(agent, t0(), &config()).unwrap();

        let first = t0() + Duration::minutes(30);
        assert_eq!(lead.record_contact(first).unwrap(), ContactOutcome::Recorded);
        assert_eq!(lead.first_contact_at, Some(first));
        assert!(lead.contact_timer_expires_at.is_none());

        let replay = first + Duration::minutes(5);
        assert_eq!(
            lead.record_contact(replay).unwrap(),
            ContactOutcome::AlreadyContacted
        );
        assert_eq!(lead.first_contact_at, Some(first));
    }

    #[test]
    fn test_record_contact_before_claim_rejected() {
        let mut lead = new_lead();
        lead.assign(Uuid::new_v4(), t0(), 5).unwrap();

        let err = lead.record_contact(t0()).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
        assert!(lead.first_contact_at.is_none());
    }

    #[test]
    fn test_breach_claim_noop_before_deadline() {
        let mut lead = new_lead();
        lead.assign(Uuid::new_v4(), t0(), 5).unwrap();

        // Exactly at the deadline is not a breach
        let err = lead.breach_claim(t0() + Duration::minutes(5)).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
        assert!(!lead.claim_sla_breached);
    }

    #[test]
    fn test_breach_claim_marks_once() {
        let mut lead = new_lead();
        lead.assign(Uuid::new_v4(), t0(), 5).unwrap();

        lead.breach_claim(t0() + Duration::minutes(6)).unwrap();
        assert!(lead.claim_sla_breached);
        assert_eq!(lead.phase(), LeadPhase::AwaitingClaim);

        let err = lead.breach_claim(t0() + Duration::minutes(7)).unwrap_err();
        assert!(matches!(err, EngineError::StateViolation(_)));
    }

    #[test]
    fn test_timer_invariants_across_lifecycle() {
        let mut lead = new_lead();
        let agent = Uuid::new_v4();

        assert!(lead.claim_timer_expires_at.is_none());

        lead.assign(agent, t0(), 5).unwrap();
        assert!(lead.claim_timer_expires_at.is_some());
        assert!(lead.contact_timer_expires_at.is_none());

        lead.claim(agent, t0(), &config()).unwrap();
        assert!(lead.claim_timer_expires_at.is_none());
        assert!(lead.contact_timer_expires_at.is_some());

        lead.record_contact(t0() + Duration::hours(1)).unwrap();
        assert!(lead.claim_timer_expires_at.is_none());
        assert!(lead.contact_timer_expires_at.is_none());
    }
}
