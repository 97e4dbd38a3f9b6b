//! Sweep Trigger Route

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::models::{SweepRequest, SweepResponse};
use crate::routes::error_response;
use crate::AppState;

/// Run the claim-window sweep
#[utoipa::path(
    post,
    path = "/leadflow/sweep",
    request_body = SweepRequest,
    responses(
        (status = 200, description = "Sweep summary", body = SweepResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Sweep"
)]
pub async fn run_sweep(
    State(state): State<AppState>,
    payload: Option<Json<SweepRequest>>,
) -> Result<Json<SweepResponse>, (axum::http::StatusCode, String)> {
    let now = payload
        .and_then(|Json(p)| p.now)
        .unwrap_or_else(Utc::now);

    let summary = state
        .sweep_service
        .sweep(now)
        .await
        .map_err(error_response)?;

    Ok(Json(SweepResponse {
        processed: summary.processed,
        errors: summary.errors,
        total: summary.total,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/leadflow/sweep", post(run_sweep))
}
