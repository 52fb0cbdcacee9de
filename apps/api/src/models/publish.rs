use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub url: String,
}

/// Destination credentials and toggles, snapshotted per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub telegram: TelegramSettings,
    pub webhook: WebhookSettings,
}

impl PublishConfig {
    /// Copy with every string trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            telegram: TelegramSettings {
                enabled: self.telegram.enabled,
                bot_token: self.telegram.bot_token.trim().to_string(),
                chat_id: self.telegram.chat_id.trim().to_string(),
            },
            webhook: WebhookSettings {
                enabled: self.webhook.enabled,
                url: self.webhook.url.trim().to_string(),
            },
        }
    }

    /// Copy safe to return over HTTP: the bot token is masked.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        if !out.telegram.bot_token.trim().is_empty() {
            out.telegram.bot_token = "********".to_string();
        }
        out
    }

    pub fn is_enabled(&self, destination: DestinationKind) -> bool {
        match destination {
            DestinationKind::Telegram => self.telegram.enabled,
            DestinationKind::Webhook => self.webhook.enabled,
        }
    }
}

/// Publish destinations in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Telegram,
    Webhook,
}

impl DestinationKind {
    pub const ALL: [DestinationKind; 2] = [DestinationKind::Telegram, DestinationKind::Webhook];

    pub fn as_str(self) -> &'static str {
        match self {
            DestinationKind::Telegram => "telegram",
            DestinationKind::Webhook => "webhook",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(DestinationKind::Telegram),
            "webhook" => Ok(DestinationKind::Webhook),
            other => Err(format!("unknown destination '{other}'")),
        }
    }
}

/// Outcome per enabled destination. Disabled destinations are absent.
pub type PublishReport = BTreeMap<DestinationKind, bool>;
