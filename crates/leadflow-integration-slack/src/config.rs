//! Slack configuration

use serde::{Deserialize, Serialize};

/// Configuration for Slack integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) for the Web API
    pub token: String,
    /// Channel used when a message targets no specific channel
    pub default_channel_id: Option<String>,
    /// Display name override for posted messages
    pub username: Option<String>,
    /// Emoji icon override (e.g. ":bell:")
    pub icon_emoji: Option<String>,
}

impl SlackConfig {
    /// Create a new Slack configuration with just a bot token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            default_channel_id: None,
            username: None,
            icon_emoji: None,
        }
    }

    /// Set the fallback channel
    pub fn with_default_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.default_channel_id = Some(channel_id.into());
        self
    }

    /// Set the posting identity
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_channel_id: None,
            username: None,
            icon_emoji: None,
        }
    }
}
