//! Request/Response DTOs

pub mod call;
pub mod lead;
pub mod reminder;
pub mod sweep;

pub use call::{CallWebhookRequest, CallWebhookResponse};
pub use lead::{ClaimLeadRequest, LeadResponse, RegisterLeadRequest, RegisterLeadResponse};
pub use reminder::{
    CreateReminderRequest, FireRemindersResponse, ReminderResponse, SnoozeReminderRequest,
};
pub use sweep::{SweepRequest, SweepResponse};
