//! Ports
//!
//! Abstract interfaces (traits) between the domain and the outside
//! world.

pub mod repositories;
pub mod services;

pub use repositories::{
    ActivityRepository, AgentRepository, CallEventRepository, CallInsert, CursorRepository,
    LeadRepository, ReminderRepository,
};
pub use services::NotificationDispatcher;
