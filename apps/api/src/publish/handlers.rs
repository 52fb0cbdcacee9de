//! Axum route handlers for manual publishing and publish settings.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::publish::{DestinationKind, PublishConfig};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub destination: DestinationKind,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub article_id: Uuid,
    pub destination: DestinationKind,
    pub delivered: bool,
}

/// POST /api/v1/articles/:id/publish
///
/// Sends one stored article to one destination, ignoring its enabled toggle.
pub async fn handle_publish_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let article = state
        .session
        .get(article_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;

    let config = state.settings.load().await?;
    state
        .dispatcher
        .publish_one(&article, request.destination, &config)
        .await?;

    info!("Article {article_id} published manually to {}", request.destination);
    Ok(Json(PublishResponse {
        article_id,
        destination: request.destination,
        delivered: true,
    }))
}

/// GET /api/v1/settings
///
/// Current publish settings with the bot token masked.
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<PublishConfig>, AppError> {
    Ok(Json(state.settings.load().await?.redacted()))
}

/// PUT /api/v1/settings
///
/// Replaces publish settings. A masked token in the body keeps the stored one.
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(request): Json<PublishConfig>,
) -> Result<Json<PublishConfig>, AppError> {
    let current = state.settings.load().await?;
    let mut updated = request.normalized();
    if updated.telegram.bot_token == current.redacted().telegram.bot_token
        && !current.telegram.bot_token.is_empty()
    {
        updated.telegram.bot_token = current.telegram.bot_token.clone();
    }

    state.settings.save(&updated).await?;
    info!(
        "Publish settings updated (telegram: {}, webhook: {})",
        updated.telegram.enabled, updated.webhook.enabled
    );
    Ok(Json(updated.redacted()))
}
