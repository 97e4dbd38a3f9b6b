//! Repository Ports
//!
//! Data access interfaces implemented by the server's Postgres adapters
//! and by in-memory doubles in tests.

pub mod activity_repository;
pub mod agent_repository;
pub mod call_repository;
pub mod cursor_repository;
pub mod lead_repository;
pub mod reminder_repository;

pub use activity_repository::ActivityRepository;
pub use agent_repository::AgentRepository;
pub use call_repository::{CallEventRepository, CallInsert};
pub use cursor_repository::CursorRepository;
pub use lead_repository::LeadRepository;
pub use reminder_repository::ReminderRepository;
