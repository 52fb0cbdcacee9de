//! Axum route handlers for the autopilot scheduler.

use axum::{extract::State, Json};

use crate::autopilot::scheduler::AutopilotStatus;
use crate::state::AppState;

/// GET /api/v1/autopilot
pub async fn handle_get_autopilot(State(state): State<AppState>) -> Json<AutopilotStatus> {
    Json(state.autopilot.status())
}

/// POST /api/v1/autopilot/start
///
/// Fires one cycle immediately, then repeats on the configured interval.
pub async fn handle_start_autopilot(State(state): State<AppState>) -> Json<AutopilotStatus> {
    Json(state.autopilot.start())
}

/// POST /api/v1/autopilot/stop
pub async fn handle_stop_autopilot(State(state): State<AppState>) -> Json<AutopilotStatus> {
    Json(state.autopilot.stop())
}
