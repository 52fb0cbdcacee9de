use std::sync::Arc;

use crate::autopilot::Autopilot;
use crate::generation::pipeline::Pipeline;
use crate::publish::Dispatcher;
use crate::session::ArticleStore;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub autopilot: Arc<Autopilot>,
    pub session: Arc<ArticleStore>,
    pub dispatcher: Dispatcher,
    /// Pluggable credential store. JSON file when SETTINGS_PATH is set, memory otherwise.
    pub settings: Arc<dyn SettingsStore>,
}
