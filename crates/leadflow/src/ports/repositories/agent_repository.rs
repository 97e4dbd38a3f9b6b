//! Agent Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Agent, EngineError, Language};

#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, EngineError>;

    /// Active agents accepting new leads in the given language, with
    /// spare capacity, in stable order by agent id. Rotation ordering is
    /// applied by the assigner over this list.
    async fn find_eligible(&self, language: Language) -> Result<Vec<Agent>, EngineError>;

    /// Atomically increment the agent's active-lead counter, guarded by
    /// `current_lead_count < max_active_leads`. `false` when the agent
    /// hit capacity between the read and the reservation.
    async fn try_reserve_slot(&self, agent_id: Uuid) -> Result<bool, EngineError>;

    /// Undo a reservation when the assignment write loses its race.
    async fn release_slot(&self, agent_id: Uuid) -> Result<(), EngineError>;

    /// Agent lookup for call attribution, by email or phone.
    async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Agent>, EngineError>;
}
