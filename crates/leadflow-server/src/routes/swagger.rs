//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    CallWebhookRequest,
    CallWebhookResponse,
    ClaimLeadRequest,
    CreateReminderRequest,
    FireRemindersResponse,
    // Lead models
    LeadResponse,
    RegisterLeadRequest,
    RegisterLeadResponse,
    // Reminder models
    ReminderResponse,
    SnoozeReminderRequest,
    // Sweep models
    SweepRequest,
    SweepResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Lead endpoints
        super::leads::register_lead,
        super::leads::claim_lead,
        // Webhook endpoints
        super::calls::ingest_call,
        // Sweep endpoints
        super::sweep::run_sweep,
        // Reminder endpoints
        super::reminders::create_reminder,
        super::reminders::snooze_reminder,
        super::reminders::complete_reminder,
        super::reminders::delete_reminder,
        super::reminders::list_due_reminders,
        super::reminders::fire_reminders,
    ),
    info(
        title = "Leadflow API",
        version = "0.3.0",
        description = "Lead assignment and SLA enforcement engine\n\nRound-robin lead distribution, claim/contact window tracking, call ingestion and follow-up reminders.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Lead", description = "Lead registration, assignment and claiming"),
        (name = "Webhook", description = "Telephony provider call ingestion"),
        (name = "Sweep", description = "Claim-window breach sweep"),
        (name = "Reminder", description = "Follow-up reminder scheduling"),
    ),
    components(
        schemas(
            // Lead
            RegisterLeadRequest,
            RegisterLeadResponse,
            ClaimLeadRequest,
            LeadResponse,
            // Webhook
            CallWebhookRequest,
            CallWebhookResponse,
            // Sweep
            SweepRequest,
            SweepResponse,
            // Reminder
            CreateReminderRequest,
            SnoozeReminderRequest,
            ReminderResponse,
            FireRemindersResponse,
        )
    ),
)]
pub struct ApiDoc;
