//! Generic JSON webhook transport.

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::article::Article;
use crate::publish::PublishError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    article_id: Uuid,
    /// `data:` URL of the composed image (raw background when uncomposed).
    image_url: String,
    title: &'a str,
}

/// POSTs the article. Any completed HTTP exchange counts as delivered;
/// only transport failures are errors.
pub async fn post_article(client: &Client, url: &str, article: &Article) -> Result<(), PublishError> {
    let payload = WebhookPayload {
        article_id: article.id,
        image_url: article.publishable_image().to_data_url(),
        title: &article.title,
    };

    let response = client.post(url).json(&payload).send().await?;
    let status = response.status();
    if status.is_success() {
        info!("Webhook delivered article {} ({status})", article.id);
    } else {
        warn!("Webhook answered {status} for article {}", article.id);
    }
    Ok(())
}
