//! Notification Dispatcher Implementation
//!
//! Fans the domain's three channels out to their transports: email via
//! the Resend API, chat via the Slack integration, in-app as rows in the
//! notifications table. Every send here is called after the triggering
//! state transition committed; failures surface as
//! `NotificationDelivery` errors for the caller to log.

use async_trait::async_trait;
use reqwest::Client;
use sqlx::PgPool;
use std::time::Duration;

use leadflow::{EngineError, InAppNotification, NotificationDispatcher};
use leadflow_integration_slack::SlackClient;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Composite dispatcher wired into the app state.
pub struct EngineNotifier {
    pool: PgPool,
    http: Client,
    resend_api_key: Option<String>,
    from_address: String,
    slack: Option<SlackClient>,
}

impl EngineNotifier {
    pub fn new(
        pool: PgPool,
        resend_api_key: Option<String>,
        from_address: String,
        slack: Option<SlackClient>,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            pool,
            http,
            resend_api_key,
            from_address,
            slack,
        }
    }
}

fn build_email_body(from: &str, to: &str, subject: &str, html: &str) -> serde_json::Value {
    serde_json::json!({
        "from": from,
        "to": [to],
        "subject": subject,
        "html": html,
    })
}

#[async_trait]
impl NotificationDispatcher for EngineNotifier {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EngineError> {
        let Some(api_key) = &self.resend_api_key else {
            return Err(EngineError::NotificationDelivery(
                "Email disabled: no Resend API key configured".to_string(),
            ));
        };

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&build_email_body(&self.from_address, to, subject, html_body))
            .send()
            .await
            .map_err(|e| EngineError::NotificationDelivery(format!("Email request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::NotificationDelivery(format!(
                "Email send failed with {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn send_chat(&self, channel_ids: &[String], message: &str) -> Result<(), EngineError> {
        let Some(slack) = &self.slack else {
            return Err(EngineError::NotificationDelivery(
                "Chat disabled: no Slack token configured".to_string(),
            ));
        };
        slack.broadcast(channel_ids, message).await
    }

    async fn send_in_app(&self, notification: &InAppNotification) -> Result<(), EngineError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, agent_id, lead_id, kind, title, message, action_url, read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(notification.id)
        .bind(notification.agent_id)
        .bind(notification.lead_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.action_url)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::NotificationDelivery(e.to_string()))?;

        Ok(())
    }
}
