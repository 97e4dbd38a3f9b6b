//! Lead Routes - Registration and Claiming
//!
//! HTTP handlers that delegate to LeadService for business logic.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use leadflow::Language;

use crate::models::{ClaimLeadRequest, LeadResponse, RegisterLeadRequest, RegisterLeadResponse};
use crate::routes::error_response;
use crate::AppState;

/// Register a lead and round-robin assign it
#[utoipa::path(
    post,
    path = "/leadflow/leads",
    request_body = RegisterLeadRequest,
    responses(
        (status = 200, description = "Lead registered", body = RegisterLeadResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Lead"
)]
pub async fn register_lead(
    State(state): State<AppState>,
    Json(payload): Json<RegisterLeadRequest>,
) -> Result<Json<RegisterLeadResponse>, (axum::http::StatusCode, String)> {
    let language: Language = payload.language.parse().map_err(error_response)?;

    let outcome = state
        .lead_service
        .register(
            payload.first_name,
            payload.last_name,
            payload.phone,
            payload.email,
            language,
            payload.lead_source,
            Utc::now(),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(RegisterLeadResponse {
        assigned_agent_id: outcome.assigned_agent.as_ref().map(|a| a.id),
        assigned: outcome.assigned_agent.is_some(),
        lead: LeadResponse::from_domain(outcome.lead),
    }))
}

/// Claim an assigned lead
///
/// Returns 409 when another agent already claimed it, an explicit
/// conflict rather than a silent failure.
#[utoipa::path(
    post,
    path = "/leadflow/leads/{lead_id}/claim",
    params(
        ("lead_id" = Uuid, Path, description = "Lead ID")
    ),
    request_body = ClaimLeadRequest,
    responses(
        (status = 200, description = "Lead claimed", body = LeadResponse),
        (status = 404, description = "Lead not found"),
        (status = 409, description = "Lead already claimed or not assigned to this agent"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Lead"
)]
pub async fn claim_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<ClaimLeadRequest>,
) -> Result<Json<LeadResponse>, (axum::http::StatusCode, String)> {
    let claimed = state
        .lead_service
        .claim(lead_id, payload.agent_id, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(LeadResponse::from_domain(claimed)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leadflow/leads", post(register_lead))
        .route("/leadflow/leads/:lead_id/claim", post(claim_lead))
}
