//! Autopilot Scheduler — fires a random-category run immediately on start,
//! then once per interval, until stopped or until a run fails.
//!
//! Each start owns a fresh `CancellationToken`. Stop cancels future ticks
//! only; a run already in flight completes and its article is kept.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::generation::pipeline::{Pipeline, RunOutcome, Trigger};
use crate::models::category::Category;

#[derive(Debug, Clone, Serialize)]
pub struct AutopilotStatus {
    pub running: bool,
    pub interval_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fire_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_category: Option<Category>,
}

#[derive(Default)]
struct SchedulerState {
    /// Present while running.
    token: Option<CancellationToken>,
    /// Bumped per start so a stale loop never clears a newer token.
    epoch: u64,
    last_fire_at: Option<DateTime<Utc>>,
    last_category: Option<Category>,
}

pub struct Autopilot {
    pipeline: Pipeline,
    interval: Duration,
    state: Mutex<SchedulerState>,
}

impl Autopilot {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn status(&self) -> AutopilotStatus {
        let state = self.lock();
        AutopilotStatus {
            running: state.token.is_some(),
            interval_secs: self.interval.as_secs(),
            last_fire_at: state.last_fire_at,
            last_category: state.last_category,
        }
    }

    /// Starts the loop. No-op when already running.
    pub fn start(self: &Arc<Self>) -> AutopilotStatus {
        {
            let mut state = self.lock();
            if state.token.is_none() {
                let token = CancellationToken::new();
                state.epoch += 1;
                state.token = Some(token.clone());
                let epoch = state.epoch;

                info!("Autopilot started (interval {}s)", self.interval.as_secs());
                tokio::spawn(Arc::clone(self).run_loop(token, epoch));
            }
        }
        self.status()
    }

    /// Stops future cycles. No-op when already stopped.
    pub fn stop(&self) -> AutopilotStatus {
        {
            let mut state = self.lock();
            if let Some(token) = state.token.take() {
                token.cancel();
                info!("Autopilot stopped");
            }
        }
        self.status()
    }

    async fn run_loop(self: Arc<Self>, token: CancellationToken, epoch: u64) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let category = Category::random();
            {
                let mut state = self.lock();
                state.last_fire_at = Some(Utc::now());
                state.last_category = Some(category);
            }

            if let RunOutcome::Failed { error } = self.pipeline.run(category, Trigger::Autopilot).await {
                warn!("Autopilot halted after failed run: {error}");
                self.halt(&token, epoch);
                break;
            }
        }
    }

    fn halt(&self, token: &CancellationToken, epoch: u64) {
        token.cancel();
        let mut state = self.lock();
        if state.epoch == epoch {
            state.token = None;
        }
    }
}
