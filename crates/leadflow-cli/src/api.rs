//! Leadflow API Client

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Leadflow
pub struct LeadflowClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct LeadResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub language: String,
    pub phase: String,
    pub claimed: bool,
    pub claim_timer_expires_at: Option<DateTime<Utc>>,
    pub claim_sla_breached: bool,
    pub first_contact_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SweepResponse {
    pub processed: usize,
    pub errors: usize,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub title: String,
    pub reminder_type: String,
    pub reminder_datetime: DateTime<Utc>,
    pub snoozed_until: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct FireRemindersResponse {
    pub notified: usize,
    pub errors: usize,
}

#[derive(Debug, Serialize)]
struct ClaimLeadRequest {
    agent_id: Uuid,
}

#[derive(Debug, Serialize)]
struct CreateReminderRequest {
    agent_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    lead_id: Option<Uuid>,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    reminder_type: String,
    reminder_datetime: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct SnoozeReminderRequest {
    minutes: i64,
}

impl LeadflowClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Trigger the claim-window sweep
    pub async fn run_sweep(&self) -> Result<SweepResponse> {
        self.post_json("/leadflow/sweep", &serde_json::json!({})).await
    }

    /// Claim a lead for an agent
    pub async fn claim_lead(&self, lead_id: &str, agent_id: Uuid) -> Result<LeadResponse> {
        self.post_json(
            &format!("/leadflow/leads/{lead_id}/claim"),
            &ClaimLeadRequest { agent_id },
        )
        .await
    }

    /// List due reminders
    pub async fn due_reminders(&self) -> Result<Vec<ReminderResponse>> {
        let url = format!("{}/leadflow/reminders/due", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("Failed to connect to Leadflow API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Create a reminder
    pub async fn create_reminder(
        &self,
        agent_id: Uuid,
        lead_id: Option<Uuid>,
        title: &str,
        notes: Option<&str>,
        reminder_type: &str,
        reminder_datetime: DateTime<Utc>,
    ) -> Result<ReminderResponse> {
        self.post_json(
            "/leadflow/reminders",
            &CreateReminderRequest {
                agent_id,
                lead_id,
                title: title.to_string(),
                notes: notes.map(str::to_string),
                reminder_type: reminder_type.to_string(),
                reminder_datetime,
            },
        )
        .await
    }

    /// Snooze a reminder
    pub async fn snooze_reminder(&self, id: &str, minutes: i64) -> Result<ReminderResponse> {
        self.post_json(
            &format!("/leadflow/reminders/{id}/snooze"),
            &SnoozeReminderRequest { minutes },
        )
        .await
    }

    /// Complete a reminder
    pub async fn complete_reminder(&self, id: &str) -> Result<ReminderResponse> {
        self.post_json(
            &format!("/leadflow/reminders/{id}/complete"),
            &serde_json::json!({}),
        )
        .await
    }

    /// Delete a reminder
    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        let url = format!("{}/leadflow/reminders/{id}", self.base_url);
        let resp = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("Failed to connect to Leadflow API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        Ok(())
    }

    /// Fire notifications for due reminders
    pub async fn fire_reminders(&self) -> Result<FireRemindersResponse> {
        self.post_json("/leadflow/reminders/fire", &serde_json::json!({}))
            .await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .context("Failed to connect to Leadflow API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }
}
