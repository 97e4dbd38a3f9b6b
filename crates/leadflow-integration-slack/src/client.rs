//! Slack Web API client wrapper

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use leadflow::EngineError;

use crate::config::SlackConfig;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Slack API client
pub struct SlackClient {
    http: Client,
    config: SlackConfig,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackClient {
    /// Create a new Slack client
    pub fn new(config: SlackConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Send a message to a channel
    pub async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), EngineError> {
        debug!(channel_id = %channel_id, content_len = %text.len(), "Posting message to Slack");

        let body = build_post_message_body(&self.config, channel_id, text);

        let response = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::NotificationDelivery(format!("Slack request failed: {e}")))?;

        let parsed: PostMessageResponse = response.json().await.map_err(|e| {
            EngineError::NotificationDelivery(format!("Invalid Slack response: {e}"))
        })?;

        if !parsed.ok {
            let reason = parsed.error.unwrap_or_else(|| "unknown".to_string());
            error!(channel_id = %channel_id, reason = %reason, "Slack rejected message");
            return Err(EngineError::NotificationDelivery(format!(
                "Slack rejected message: {reason}"
            )));
        }

        Ok(())
    }

    /// Send the same message to several channels. Per-channel failures
    /// are collected; one bad channel does not stop the rest.
    pub async fn broadcast(&self, channel_ids: &[String], text: &str) -> Result<(), EngineError> {
        let targets: Vec<&str> = if channel_ids.is_empty() {
            match &self.config.default_channel_id {
                Some(fallback) => vec![fallback.as_str()],
                None => return Ok(()),
            }
        } else {
            channel_ids.iter().map(String::as_str).collect()
        };

        let mut failures = Vec::new();
        for channel in targets {
            if let Err(e) = self.send_message(channel, text).await {
                failures.push(format!("{channel}: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::NotificationDelivery(failures.join("; ")))
        }
    }
}

fn build_post_message_body(
    config: &SlackConfig,
    channel_id: &str,
    text: &str,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "channel": channel_id,
        "text": text,
    });
    if let Some(username) = &config.username {
        body["username"] = serde_json::Value::String(username.clone());
    }
    if let Some(icon) = &config.icon_emoji {
        body["icon_emoji"] = serde_json::Value::String(icon.clone());
    }
    body
}
