//! Domain Errors
//!
//! Error types for engine operations.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::Language;

/// Engine layer errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// An illegal lifecycle transition was attempted. Callers handling
    /// external events (webhooks, sweeps) treat this as a no-op.
    #[error("State violation: {0}")]
    StateViolation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Round-robin found no agent with spare capacity. The lead stays
    /// unassigned; reportable, not fatal.
    #[error("No eligible agent for language {language}")]
    NoEligibleAgent { language: Language },

    /// A webhook replay. Resolved as a success no-op.
    #[error("Duplicate event: {0}")]
    DuplicateEvent(String),

    /// A best-effort side effect failed. Logged, never reverses the
    /// state transition that triggered it.
    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl EngineError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found_str<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn state_violation<T: Into<String>>(reason: T) -> Self {
        Self::StateViolation(reason.into())
    }
}
