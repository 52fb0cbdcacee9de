//! Axum route handlers for the Articles API.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::autopilot::gate::GenerationState;
use crate::errors::AppError;
use crate::generation::pipeline::{EditOutcome, RunOutcome, Trigger};
use crate::models::article::ArticleSummary;
use crate::models::category::{Category, CategoryProfile, CATEGORY_TABLE};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    /// Random category when absent.
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct EditArticleRequest {
    pub instruction: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub frame: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: &'static [CategoryProfile],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/categories
pub async fn handle_list_categories() -> Json<CategoryListResponse> {
    Json(CategoryListResponse {
        categories: &CATEGORY_TABLE,
    })
}

/// GET /api/v1/articles
///
/// Session articles, newest first. Image bytes are served by the image route.
pub async fn handle_list_articles(State(state): State<AppState>) -> Json<ArticleListResponse> {
    Json(ArticleListResponse {
        articles: state.session.list().await,
    })
}

/// POST /api/v1/articles/generate
///
/// Runs one manual cycle (generate → compose → publish) and waits for it.
/// The run is detached from the request, so a client disconnect never
/// interrupts it. Returns 409 while another run holds the generation gate.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<RunOutcome>, AppError> {
    let category = request.category.unwrap_or_else(Category::random);

    let pipeline = state.pipeline.clone();
    let run = tokio::spawn(async move { pipeline.run(category, Trigger::Manual).await });
    let outcome = run
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("generation task failed: {e}")))?;

    match outcome {
        RunOutcome::Skipped => Err(AppError::Conflict(
            "A generation run is already in progress".to_string(),
        )),
        RunOutcome::Failed { error } => Err(AppError::Generation(error)),
        completed => Ok(Json(completed)),
    }
}

/// GET /api/v1/articles/:id
pub async fn handle_get_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ArticleSummary>, AppError> {
    let article = state
        .session
        .get(article_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;
    Ok(Json(article.summary()))
}

/// GET /api/v1/articles/:id/image?frame=N
///
/// Composed frame N (default 0). Falls back to the raw background when the
/// article has no composed frames and no frame was requested.
pub async fn handle_get_image(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let article = state
        .session
        .get(article_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Article {article_id} not found")))?;

    let image = match query.frame {
        Some(n) => article
            .composed_frames
            .get(n)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Article {article_id} has no frame {n}")))?,
        None => article.publishable_image().clone(),
    };

    Ok(([(header::CONTENT_TYPE, image.mime.clone())], Body::from(image.bytes)).into_response())
}

/// POST /api/v1/articles/:id/edit
///
/// Rewrites title/description per the instruction and re-composes the card.
pub async fn handle_edit_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Json(request): Json<EditArticleRequest>,
) -> Result<Json<ArticleSummary>, AppError> {
    let instruction = request.instruction.trim();
    if instruction.is_empty() {
        return Err(AppError::Validation("instruction cannot be empty".to_string()));
    }

    match state.pipeline.edit(article_id, instruction).await {
        EditOutcome::Edited(article) => Ok(Json(article.summary())),
        EditOutcome::NotFound => Err(AppError::NotFound(format!("Article {article_id} not found"))),
        EditOutcome::Busy => Err(AppError::Conflict(
            "A generation run is already in progress".to_string(),
        )),
        EditOutcome::Failed(error) => Err(AppError::Generation(error)),
    }
}

/// GET /api/v1/state
pub async fn handle_get_state(State(state): State<AppState>) -> Json<GenerationState> {
    Json(state.pipeline.gate().snapshot())
}
