//! Lead DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use leadflow::{Lead, LeadPhase};

/// Register lead request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterLeadRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Two-letter locale code (en, es, fr, ...)
    pub language: String,
    pub lead_source: Option<String>,
}

/// Claim lead request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimLeadRequest {
    pub agent_id: Uuid,
}

/// Lead response
#[derive(Debug, Serialize, ToSchema)]
pub struct LeadResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub language: String,
    pub lead_source: Option<String>,
    /// Derived lifecycle phase
    pub phase: String,
    pub assigned_agent_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub claimed: bool,
    pub claim_timer_expires_at: Option<DateTime<Utc>>,
    pub claim_sla_breached: bool,
    pub first_contact_at: Option<DateTime<Utc>>,
    pub contact_timer_expires_at: Option<DateTime<Utc>>,
    pub contact_sla_breached: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

fn phase_label(phase: LeadPhase) -> &'static str {
    match phase {
        LeadPhase::Unassigned => "unassigned",
        LeadPhase::AwaitingClaim => "awaiting_claim",
        LeadPhase::AwaitingContact => "awaiting_contact",
        LeadPhase::Contacted => "contacted",
    }
}

impl LeadResponse {
    pub fn from_domain(lead: Lead) -> Self {
        let phase = phase_label(lead.phase()).to_string();
        Self {
            id: lead.id,
            first_name: lead.first_name,
            last_name: lead.last_name,
            phone_number: lead.phone_number,
            email: lead.email,
            language: lead.language.as_str().to_string(),
            lead_source: lead.lead_source,
            phase,
            assigned_agent_id: lead.assigned_agent_id,
            assigned_at: lead.assigned_at,
            claimed: lead.claimed,
            claim_timer_expires_at: lead.claim_timer_expires_at,
            claim_sla_breached: lead.claim_sla_breached,
            first_contact_at: lead.first_contact_at,
            contact_timer_expires_at: lead.contact_timer_expires_at,
            contact_sla_breached: lead.contact_sla_breached,
            archived: lead.archived,
            created_at: lead.created_at,
        }
    }
}

/// Register lead response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterLeadResponse {
    pub lead: LeadResponse,
    /// Agent the lead was round-robin assigned to, if anyone had
    /// capacity
    pub assigned_agent_id: Option<Uuid>,
    pub assigned: bool,
}
