//! Domain Entities

pub mod activity;
pub mod agent;
pub mod call;
pub mod cursor;
pub mod lead;
pub mod notification;
pub mod reminder;

pub use activity::Activity;
pub use agent::Agent;
pub use call::{CallDirection, CallEvent};
pub use cursor::RoundRobinCursor;
pub use lead::{ContactOutcome, Lead, LeadPhase};
pub use notification::{InAppNotification, NotificationKind};
pub use reminder::Reminder;
