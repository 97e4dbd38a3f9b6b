//! Leadflow API Routes
//!
//! - /leadflow/leads - Lead registration and claiming
//! - /leadflow/webhooks/call - Telephony provider call ingestion
//! - /leadflow/sweep - Claim-window sweep trigger
//! - /leadflow/reminders - Follow-up reminder scheduling

use axum::http::StatusCode;

use leadflow::EngineError;

pub mod calls;
pub mod leads;
pub mod reminders;
pub mod swagger;
pub mod sweep;

/// Map an engine error onto the status an interactive caller sees.
/// Webhook routes do not use this; they answer 200 regardless.
pub(crate) fn error_response(err: EngineError) -> (StatusCode, String) {
    let status = match &err {
        EngineError::StateViolation(_) => StatusCode::CONFLICT,
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::DuplicateEvent(_) => StatusCode::CONFLICT,
        EngineError::NoEligibleAgent { .. } => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::NotificationDelivery(_) | EngineError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
