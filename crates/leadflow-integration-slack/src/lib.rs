//! Slack Integration for Leadflow
//!
//! Posts engine notifications (new-lead alerts, SLA escalations, due
//! reminders) into Slack channels via the Web API. Delivery is
//! best-effort by contract: callers log failures and never roll back
//! the state transition that produced the message.

pub mod client;
pub mod config;

pub use client::SlackClient;
pub use config::SlackConfig;
