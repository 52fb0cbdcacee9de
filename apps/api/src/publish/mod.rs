//! Publish Dispatcher — best-effort fan-out of one article to every enabled
//! destination.
//!
//! Destinations run sequentially in `DestinationKind::ALL` order. Each outcome
//! is isolated: a failure is logged and reported as `false`, and the next
//! destination is still attempted. `publish` never returns an error.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::article::Article;
use crate::models::publish::{DestinationKind, PublishConfig, PublishReport};

pub mod caption;
pub mod handlers;
pub mod telegram;
pub mod webhook;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{destination} configuration incomplete: missing {missing}")]
    ConfigurationIncomplete {
        destination: DestinationKind,
        missing: &'static str,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{destination} rejected the request (status {status}): {body}")]
    Rejected {
        destination: DestinationKind,
        status: u16,
        body: String,
    },
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    telegram_api_base: String,
}

impl Dispatcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(PUBLISH_TIMEOUT).build()?,
            telegram_api_base: telegram::TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Points Telegram calls at another host.
    #[cfg(test)]
    pub fn with_telegram_api_base(mut self, base: impl Into<String>) -> Self {
        self.telegram_api_base = base.into();
        self
    }

    /// Publishes to every enabled destination. Disabled destinations are
    /// absent from the report.
    pub async fn publish(&self, article: &Article, config: &PublishConfig) -> PublishReport {
        let config = config.normalized();
        let mut report = PublishReport::new();

        for destination in DestinationKind::ALL {
            if !config.is_enabled(destination) {
                continue;
            }
            // An enabled webhook without a URL is a silent skip, not a failure.
            if destination == DestinationKind::Webhook && config.webhook.url.is_empty() {
                debug!("Webhook enabled without URL, skipping");
                report.insert(destination, true);
                continue;
            }

            let delivered = match self.publish_one(article, destination, &config).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Publishing article {} to {destination} failed: {e}", article.id);
                    false
                }
            };
            report.insert(destination, delivered);
        }
        report
    }

    /// Publishes to one destination regardless of its enabled toggle.
    /// Credentials are still required.
    pub async fn publish_one(
        &self,
        article: &Article,
        destination: DestinationKind,
        config: &PublishConfig,
    ) -> Result<(), PublishError> {
        let config = config.normalized();
        match destination {
            DestinationKind::Telegram => {
                let caption = caption::build_caption(article);
                telegram::send_photo(
                    &self.client,
                    &self.telegram_api_base,
                    &config.telegram,
                    article.publishable_image(),
                    &caption,
                )
                .await
            }
            DestinationKind::Webhook => {
                if config.webhook.url.is_empty() {
                    return Err(PublishError::ConfigurationIncomplete {
                        destination,
                        missing: "url",
                    });
                }
                webhook::post_article(&self.client, &config.webhook.url, article).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::SourceLink;
    use crate::models::category::Category;
    use crate::models::image::ImageData;
    use crate::models::publish::{TelegramSettings, WebhookSettings};
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article() -> Article {
        Article {
            id: Uuid::new_v4(),
            category: Category::Agriculture,
            title: "جرار يقود نفسه".to_string(),
            description: "تجربة ميدانية ناجحة".to_string(),
            author: None,
            date_label: "اليوم".to_string(),
            sources: vec![SourceLink {
                uri: "https://farm.example".to_string(),
                title: "Farm".to_string(),
            }],
            created_at: Utc::now(),
            raw_image: ImageData::new("image/jpeg", vec![1, 2, 3]),
            composed_frames: vec![ImageData::png(b"fakepng".to_vec())],
        }
    }

    fn config(telegram: bool, token: &str, chat: &str, webhook: bool, url: &str) -> PublishConfig {
        PublishConfig {
            telegram: TelegramSettings {
                enabled: telegram,
                bot_token: token.to_string(),
                chat_id: chat.to_string(),
            },
            webhook: WebhookSettings {
                enabled: webhook,
                url: url.to_string(),
            },
        }
    }

    fn dispatcher(server: &MockServer) -> Dispatcher {
        Dispatcher::new()
            .unwrap()
            .with_telegram_api_base(server.uri())
    }

    #[tokio::test]
    async fn test_nothing_enabled_yields_empty_report() {
        let server = MockServer::start().await;
        let report = dispatcher(&server)
            .publish(&article(), &PublishConfig::default())
            .await;
        assert!(report.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_telegram_failure_does_not_block_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(true, "123:abc", "@news", true, &format!("{}/hook", server.uri()));
        let report = dispatcher(&server).publish(&article(), &cfg).await;

        assert_eq!(report.get(&DestinationKind::Telegram), Some(&false));
        assert_eq!(report.get(&DestinationKind::Webhook), Some(&true));
    }

    #[tokio::test]
    async fn test_blank_telegram_credentials_skip_network() {
        let server = MockServer::start().await;
        let cfg = config(true, "   ", "@news", false, "");
        let report = dispatcher(&server).publish(&article(), &cfg).await;

        assert_eq!(report.get(&DestinationKind::Telegram), Some(&false));
        assert!(server.received_requests().await.unwrap().is_empty());

        let err = dispatcher(&server)
            .publish_one(&article(), DestinationKind::Telegram, &config(true, "t", " ", false, ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PublishError::ConfigurationIncomplete { missing: "chat id", .. }
        ));
    }

    #[tokio::test]
    async fn test_telegram_sends_multipart_with_normalized_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .and(body_string_contains("name=\"chat_id\""))
            .and(body_string_contains("filename=\"snap_final.png\""))
            .and(body_string_contains("name=\"parse_mode\""))
            .and(body_string_contains("<b>جرار يقود نفسه</b>"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(true, "  Bot123:abc ", " @news ", false, "");
        let report = dispatcher(&server).publish(&article(), &cfg).await;
        assert_eq!(report.get(&DestinationKind::Telegram), Some(&true));
        assert!(report.get(&DestinationKind::Webhook).is_none());
    }

    #[tokio::test]
    async fn test_webhook_payload_and_non_2xx_counts_as_delivered() {
        let server = MockServer::start().await;
        let a = article();
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(json!({
                "articleId": a.id,
                "title": "جرار يقود نفسه",
                "imageUrl": "data:image/png;base64,ZmFrZXBuZw=="
            })))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(false, "", "", true, &format!("  {}/hook ", server.uri()));
        let report = dispatcher(&server).publish(&a, &cfg).await;
        assert_eq!(report.get(&DestinationKind::Webhook), Some(&true));
    }

    #[tokio::test]
    async fn test_webhook_transport_error_is_false() {
        let server = MockServer::start().await;
        // Nothing listens on port 9 (discard) in the test environment.
        let cfg = config(false, "", "", true, "http://127.0.0.1:9/hook");
        let report = dispatcher(&server).publish(&article(), &cfg).await;
        assert_eq!(report.get(&DestinationKind::Webhook), Some(&false));
    }

    #[tokio::test]
    async fn test_enabled_webhook_without_url_reports_true() {
        let server = MockServer::start().await;
        let cfg = config(false, "", "", true, "   ");
        let report = dispatcher(&server).publish(&article(), &cfg).await;
        assert_eq!(report.get(&DestinationKind::Webhook), Some(&true));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_publish_ignores_enabled_toggle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(false, "", "", false, &format!("{}/hook", server.uri()));
        dispatcher(&server)
            .publish_one(&article(), DestinationKind::Webhook, &cfg)
            .await
            .unwrap();
    }
}
