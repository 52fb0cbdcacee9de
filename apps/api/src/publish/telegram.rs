//! Telegram `sendPhoto` transport.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::info;

use crate::models::image::ImageData;
use crate::models::publish::{DestinationKind, TelegramSettings};
use crate::publish::PublishError;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const PHOTO_FILE_NAME: &str = "snap_final.png";

/// Trims the token and strips a leading `bot` (any case) pasted from a URL.
pub fn normalize_token(raw: &str) -> String {
    let token = raw.trim();
    match token.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bot") => token[3..].trim().to_string(),
        _ => token.to_string(),
    }
}

/// Sends one photo with caption. Blank credentials fail before any request.
pub async fn send_photo(
    client: &Client,
    api_base: &str,
    settings: &TelegramSettings,
    image: &ImageData,
    caption: &str,
) -> Result<(), PublishError> {
    let token = normalize_token(&settings.bot_token);
    let chat_id = settings.chat_id.trim();
    if token.is_empty() {
        return Err(PublishError::ConfigurationIncomplete {
            destination: DestinationKind::Telegram,
            missing: "bot token",
        });
    }
    if chat_id.is_empty() {
        return Err(PublishError::ConfigurationIncomplete {
            destination: DestinationKind::Telegram,
            missing: "chat id",
        });
    }

    let photo = Part::bytes(image.bytes.to_vec())
        .file_name(PHOTO_FILE_NAME)
        .mime_str(&image.mime)?;
    let form = Form::new()
        .text("chat_id", chat_id.to_string())
        .part("photo", photo)
        .text("caption", caption.to_string())
        .text("parse_mode", "HTML");

    let url = format!("{}/bot{}/sendPhoto", api_base.trim_end_matches('/'), token);
    let response = client.post(url).multipart(form).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PublishError::Rejected {
            destination: DestinationKind::Telegram,
            status: status.as_u16(),
            body,
        });
    }

    info!("Telegram photo sent to chat {chat_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token_strips_bot_prefix_any_case() {
        assert_eq!(normalize_token("  bot123:abc "), "123:abc");
        assert_eq!(normalize_token("BOT123:abc"), "123:abc");
        assert_eq!(normalize_token("Bot123:abc"), "123:abc");
        assert_eq!(normalize_token("123:abc"), "123:abc");
    }

    #[test]
    fn test_normalize_token_short_and_empty() {
        assert_eq!(normalize_token(""), "");
        assert_eq!(normalize_token("bo"), "bo");
        assert_eq!(normalize_token("bot"), "");
    }

    #[test]
    fn test_normalize_token_non_ascii_prefix_is_kept() {
        assert_eq!(normalize_token("éb12"), "éb12");
    }
}
