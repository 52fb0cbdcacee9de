pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::autopilot::handlers as autopilot;
use crate::generation::handlers as articles;
use crate::publish::handlers as publish;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/categories", get(articles::handle_list_categories))
        .route("/api/v1/state", get(articles::handle_get_state))
        // Articles
        .route("/api/v1/articles", get(articles::handle_list_articles))
        .route("/api/v1/articles/generate", post(articles::handle_generate))
        .route("/api/v1/articles/:id", get(articles::handle_get_article))
        .route("/api/v1/articles/:id/image", get(articles::handle_get_image))
        .route("/api/v1/articles/:id/edit", post(articles::handle_edit_article))
        .route(
            "/api/v1/articles/:id/publish",
            post(publish::handle_publish_article),
        )
        // Autopilot
        .route("/api/v1/autopilot", get(autopilot::handle_get_autopilot))
        .route(
            "/api/v1/autopilot/start",
            post(autopilot::handle_start_autopilot),
        )
        .route("/api/v1/autopilot/stop", post(autopilot::handle_stop_autopilot))
        // Publish settings
        .route(
            "/api/v1/settings",
            get(publish::handle_get_settings).put(publish::handle_put_settings),
        )
        .with_state(state)
}
