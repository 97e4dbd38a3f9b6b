//! Sweep DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sweep trigger request. `now` exists for testability; production
/// triggers send an empty body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SweepRequest {
    pub now: Option<DateTime<Utc>>,
}

/// Sweep summary response
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepResponse {
    pub processed: usize,
    pub errors: usize,
    pub total: usize,
}
