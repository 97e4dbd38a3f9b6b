//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod notifier;
pub mod postgres;

// Re-exports
pub use notifier::EngineNotifier;
pub use postgres::{
    PgActivityRepository, PgAgentRepository, PgCallEventRepository, PgCursorRepository,
    PgLeadRepository, PgReminderRepository,
};
