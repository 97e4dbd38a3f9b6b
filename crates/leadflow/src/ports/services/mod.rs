//! Service Ports

pub mod notifier;

pub use notifier::NotificationDispatcher;
