use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::LayoutStrategy;
use crate::models::publish::{PublishConfig, TelegramSettings, WebhookSettings};

pub const DEFAULT_BRAND_MARK: &str = "👻 K3333BI";
const DEFAULT_SESSION_CAPACITY: usize = 50;
/// 25 minutes between autopilot cycles.
const DEFAULT_AUTOPILOT_INTERVAL_SECS: u64 = 1500;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub font_path: Option<PathBuf>,
    pub brand_mark: String,
    pub layout: LayoutStrategy,
    pub autopilot_interval: Duration,
    pub autopilot_on_start: bool,
    /// Articles kept in the session list before the oldest are dropped.
    pub session_capacity: usize,
    /// JSON file for publish settings; in-memory only when unset.
    pub settings_path: Option<PathBuf>,
    /// Initial publish settings, used until the store holds its own.
    pub publish_seed: PublishConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let autopilot_secs = parse_env("AUTOPILOT_INTERVAL_SECS", DEFAULT_AUTOPILOT_INTERVAL_SECS)?;
        if autopilot_secs == 0 {
            anyhow::bail!("AUTOPILOT_INTERVAL_SECS must be greater than zero");
        }

        let session_capacity = parse_env("SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)?;
        if session_capacity == 0 {
            anyhow::bail!("SESSION_CAPACITY must be greater than zero");
        }

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            font_path: optional_env("FONT_PATH").map(PathBuf::from),
            brand_mark: optional_env("BRAND_MARK").unwrap_or_else(|| DEFAULT_BRAND_MARK.to_string()),
            layout: match optional_env("LAYOUT") {
                Some(raw) => LayoutStrategy::from_str(&raw)
                    .map_err(anyhow::Error::msg)
                    .context("LAYOUT must be 'single' or 'two_frame'")?,
                None => LayoutStrategy::default(),
            },
            autopilot_interval: Duration::from_secs(autopilot_secs),
            autopilot_on_start: parse_bool_env("AUTOPILOT_ON_START")?,
            session_capacity,
            settings_path: optional_env("SETTINGS_PATH").map(PathBuf::from),
            publish_seed: PublishConfig {
                telegram: TelegramSettings {
                    enabled: parse_bool_env("TG_ENABLED")?,
                    bot_token: optional_env("TG_BOT_TOKEN").unwrap_or_default(),
                    chat_id: optional_env("TG_CHAT_ID").unwrap_or_default(),
                },
                webhook: WebhookSettings {
                    enabled: parse_bool_env("WEBHOOK_ENABLED")?,
                    url: optional_env("WEBHOOK_URL").unwrap_or_default(),
                },
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool_env(key: &str) -> Result<bool> {
    match optional_env(key) {
        Some(raw) => parse_flag(&raw).with_context(|| format!("{key} must be true or false, got '{raw}'")),
        None => Ok(false),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
