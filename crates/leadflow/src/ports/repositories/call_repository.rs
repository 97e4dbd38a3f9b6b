//! Call Event Repository Port

use async_trait::async_trait;

use crate::domain::{CallEvent, EngineError};

/// Result of recording a call, distinguishing the idempotent replay.
#[derive(Debug, Clone)]
pub enum CallInsert {
    Recorded(CallEvent),
    /// The provider already delivered this call id; nothing was written.
    Duplicate,
}

#[async_trait]
pub trait CallEventRepository: Send + Sync {
    /// Insert the call, relying on the unique provider call id for
    /// idempotency. A second delivery of the same id yields
    /// [`CallInsert::Duplicate`], never an error.
    async fn record(&self, call: &CallEvent) -> Result<CallInsert, EngineError>;
}
