mod autopilot;
mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod publish;
mod render;
mod routes;
mod session;
mod settings;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::autopilot::{Autopilot, GenerationGate};
use crate::config::Config;
use crate::generation::assembler::ArticleAssembler;
use crate::generation::generator::GeminiContentGenerator;
use crate::generation::imagery::GeminiImageGenerator;
use crate::generation::pipeline::Pipeline;
use crate::llm_client::LlmClient;
use crate::publish::Dispatcher;
use crate::render::Compositor;
use crate::routes::build_router;
use crate::session::ArticleStore;
use crate::settings::{JsonFileSettings, MemorySettings, SettingsStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storysmith API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (shared by drafting and background generation)
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!(
        "LLM client initialized (text: {}, image: {})",
        llm_client::TEXT_MODEL,
        llm_client::IMAGE_MODEL
    );

    // Compositor: FONT_PATH overrides the built-in card font
    let compositor = Compositor::from_font_path(config.layout.canvas(), config.font_path.as_deref());
    info!("Layout strategy: {:?}", config.layout);

    let assembler = Arc::new(ArticleAssembler::new(
        Arc::new(GeminiContentGenerator::new(llm.clone())),
        Arc::new(GeminiImageGenerator::new(llm)),
        compositor,
        config.layout,
        config.brand_mark.clone(),
    ));

    // Publish settings store
    let settings: Arc<dyn SettingsStore> = match &config.settings_path {
        Some(path) => {
            info!("Publish settings persisted at {}", path.display());
            Arc::new(JsonFileSettings::new(path.clone(), config.publish_seed.clone()))
        }
        None => {
            info!("Publish settings held in memory (SETTINGS_PATH not set)");
            Arc::new(MemorySettings::new(config.publish_seed.clone()))
        }
    };

    let session = Arc::new(ArticleStore::new(config.session_capacity));
    let dispatcher = Dispatcher::new()?;
    let pipeline = Pipeline::new(
        Arc::new(GenerationGate::new()),
        assembler,
        Arc::clone(&session),
        dispatcher.clone(),
        Arc::clone(&settings),
    );
    let autopilot = Arc::new(Autopilot::new(pipeline.clone(), config.autopilot_interval));

    if config.autopilot_on_start {
        autopilot.start();
    }

    // Build app state
    let state = AppState {
        pipeline,
        autopilot,
        session,
        dispatcher,
        settings,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
