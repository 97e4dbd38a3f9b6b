//! Domain Layer
//!
//! Pure business entities and logic, no infrastructure dependencies.

pub mod entities;
pub mod errors;
pub mod matcher;
pub mod sla;
pub mod value_objects;

pub use entities::{
    Activity, Agent, CallDirection, CallEvent, ContactOutcome, InAppNotification, Lead, LeadPhase,
    NotificationKind, Reminder, RoundRobinCursor,
};
pub use errors::EngineError;
pub use sla::SlaConfig;
pub use value_objects::{Language, NormalizedPhone, ReminderType};
