//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between repositories
//! and external services.

mod ingest;
mod leads;
mod reminders;
mod sweep;

#[cfg(test)]
pub mod test_support;

pub use ingest::{InboundCall, IngestOutcome, IngestService};
pub use leads::{LeadService, RegisterOutcome};
pub use reminders::{FireSummary, ReminderService};
pub use sweep::{SweepService, SweepSummary};
