//! Value Objects
//!
//! Immutable value types shared across the domain.

pub mod language;
pub mod phone;
pub mod reminder_type;

pub use language::Language;
pub use phone::{normalize, NormalizedPhone, SUFFIX_KEY_LEN};
pub use reminder_type::ReminderType;
