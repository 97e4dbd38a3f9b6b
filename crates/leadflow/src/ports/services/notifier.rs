//! Notification Dispatcher Port
//!
//! The engine's only view of the delivery side: email, chat and in-app
//! channels. State transitions commit before any of these run, and a
//! delivery failure is logged by the caller, never propagated into the
//! transition. Re-sending a notification is safe; losing a transition
//! is not.

use async_trait::async_trait;

use crate::domain::{EngineError, InAppNotification};

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, html_body: &str)
        -> Result<(), EngineError>;

    async fn send_chat(&self, channel_ids: &[String], message: &str) -> Result<(), EngineError>;

    async fn send_in_app(&self, notification: &InAppNotification) -> Result<(), EngineError>;
}
