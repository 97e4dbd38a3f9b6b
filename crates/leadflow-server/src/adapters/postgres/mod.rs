//! PostgreSQL Adapters

pub mod activity_repository;
pub mod agent_repository;
pub mod call_repository;
pub mod cursor_repository;
pub mod lead_repository;
pub mod reminder_repository;

pub use activity_repository::PgActivityRepository;
pub use agent_repository::PgAgentRepository;
pub use call_repository::PgCallEventRepository;
pub use cursor_repository::PgCursorRepository;
pub use lead_repository::PgLeadRepository;
pub use reminder_repository::PgReminderRepository;
