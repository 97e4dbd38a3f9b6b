//! Leadflow Domain Library
//!
//! Core domain types and interfaces for the lead assignment and SLA
//! enforcement engine.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Lead, Agent, CallEvent, Reminder)
//!   - `value_objects/`: Immutable value types (Language, NormalizedPhone)
//!   - `sla`: Pure deadline arithmetic for the claim/contact windows
//!   - `matcher`: Fuzzy phone-to-lead matching
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces with the atomic
//!     conditional operations the concurrency contract requires
//!   - `services/`: Notification dispatch interface

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Activity, Agent, CallDirection, CallEvent, ContactOutcome, EngineError, InAppNotification,
    Language, Lead, LeadPhase, NormalizedPhone, NotificationKind, Reminder, ReminderType,
    RoundRobinCursor, SlaConfig,
};
pub use ports::{
    ActivityRepository, AgentRepository, CallEventRepository, CallInsert, CursorRepository,
    LeadRepository, NotificationDispatcher, ReminderRepository,
};
