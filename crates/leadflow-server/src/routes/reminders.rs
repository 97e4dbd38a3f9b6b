//! Reminder Routes
//!
//! HTTP handlers that delegate to ReminderService for business logic.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use leadflow::ReminderType;

use crate::models::{
    CreateReminderRequest, FireRemindersResponse, ReminderResponse, SnoozeReminderRequest,
};
use crate::routes::error_response;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DueQuery {
    /// Override of "now" for testability
    pub now: Option<DateTime<Utc>>,
}

/// Create a reminder
#[utoipa::path(
    post,
    path = "/leadflow/reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 200, description = "Reminder created", body = ReminderResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn create_reminder(
    State(state): State<AppState>,
    Json(payload): Json<CreateReminderRequest>,
) -> Result<Json<ReminderResponse>, (axum::http::StatusCode, String)> {
    let reminder_type: ReminderType = payload.reminder_type.parse().map_err(error_response)?;

    let reminder = state
        .reminder_service
        .create(
            payload.agent_id,
            payload.lead_id,
            payload.title,
            payload.notes,
            reminder_type,
            payload.reminder_datetime,
            payload.send_email,
            payload.send_chat,
            Utc::now(),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ReminderResponse::from_domain(reminder)))
}

/// Snooze a reminder
#[utoipa::path(
    post,
    path = "/leadflow/reminders/{reminder_id}/snooze",
    params(
        ("reminder_id" = Uuid, Path, description = "Reminder ID")
    ),
    request_body = SnoozeReminderRequest,
    responses(
        (status = 200, description = "Reminder snoozed", body = ReminderResponse),
        (status = 404, description = "Reminder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn snooze_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<Uuid>,
    Json(payload): Json<SnoozeReminderRequest>,
) -> Result<Json<ReminderResponse>, (axum::http::StatusCode, String)> {
    let reminder = state
        .reminder_service
        .snooze(reminder_id, payload.minutes, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(ReminderResponse::from_domain(reminder)))
}

/// Complete a reminder (idempotent)
#[utoipa::path(
    post,
    path = "/leadflow/reminders/{reminder_id}/complete",
    params(
        ("reminder_id" = Uuid, Path, description = "Reminder ID")
    ),
    responses(
        (status = 200, description = "Reminder completed", body = ReminderResponse),
        (status = 404, description = "Reminder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn complete_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<ReminderResponse>, (axum::http::StatusCode, String)> {
    let reminder = state
        .reminder_service
        .complete(reminder_id, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(ReminderResponse::from_domain(reminder)))
}

/// Delete a reminder
#[utoipa::path(
    delete,
    path = "/leadflow/reminders/{reminder_id}",
    params(
        ("reminder_id" = Uuid, Path, description = "Reminder ID")
    ),
    responses(
        (status = 200, description = "Reminder deleted"),
        (status = 404, description = "Reminder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (axum::http::StatusCode, String)> {
    state
        .reminder_service
        .delete(reminder_id)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Reminder deleted"
    })))
}

/// List due reminders
#[utoipa::path(
    get,
    path = "/leadflow/reminders/due",
    responses(
        (status = 200, description = "Due reminders, oldest first", body = Vec<ReminderResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn list_due_reminders(
    State(state): State<AppState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<ReminderResponse>>, (axum::http::StatusCode, String)> {
    let now = query.now.unwrap_or_else(Utc::now);
    let due = state
        .reminder_service
        .due(now)
        .await
        .map_err(error_response)?;

    Ok(Json(
        due.into_iter().map(ReminderResponse::from_domain).collect(),
    ))
}

/// Dispatch notifications for due reminders
#[utoipa::path(
    post,
    path = "/leadflow/reminders/fire",
    responses(
        (status = 200, description = "Firing summary", body = FireRemindersResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reminder"
)]
pub async fn fire_reminders(
    State(state): State<AppState>,
) -> Result<Json<FireRemindersResponse>, (axum::http::StatusCode, String)> {
    let summary = state
        .reminder_service
        .fire_due(Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(FireRemindersResponse {
        notified: summary.notified,
        errors: summary.errors,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leadflow/reminders", post(create_reminder))
        .route("/leadflow/reminders/due", get(list_due_reminders))
        .route("/leadflow/reminders/fire", post(fire_reminders))
        .route(
            "/leadflow/reminders/:reminder_id",
            delete(delete_reminder),
        )
        .route(
            "/leadflow/reminders/:reminder_id/snooze",
            post(snooze_reminder),
        )
        .route(
            "/leadflow/reminders/:reminder_id/complete",
            post(complete_reminder),
        )
}
