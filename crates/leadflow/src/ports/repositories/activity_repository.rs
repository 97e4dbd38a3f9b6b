//! Activity Repository Port

use async_trait::async_trait;

use crate::domain::{Activity, EngineError};

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn insert(&self, activity: &Activity) -> Result<Activity, EngineError>;
}
