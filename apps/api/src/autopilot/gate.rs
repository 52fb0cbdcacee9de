//! Generation State — the single-flight gate shared by manual and scheduled runs.
//!
//! Idle → Generating on `try_begin`; Generating → Idle on `finish`,
//! Generating → Error on `fail`. Error behaves like Idle for admission.
//! A ticket dropped without settling (panic, cancelled future) resets to Idle.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Generating,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationState {
    pub phase: Phase,
    pub status_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl GenerationState {
    fn idle(status_message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Idle,
            status_message: status_message.into(),
            error_message: None,
            updated_at: Utc::now(),
        }
    }
}

pub struct GenerationGate {
    state: Mutex<GenerationState>,
}

impl Default for GenerationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GenerationState::idle("")),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GenerationState> {
        // Every critical section leaves the state consistent; poisoning carries no meaning here.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> GenerationState {
        self.lock().clone()
    }

    /// Enters Generating unless a run is already in flight.
    pub fn try_begin(self: &Arc<Self>, status_message: impl Into<String>) -> Option<RunTicket> {
        let mut state = self.lock();
        if state.phase == Phase::Generating {
            return None;
        }
        *state = GenerationState {
            phase: Phase::Generating,
            status_message: status_message.into(),
            error_message: None,
            updated_at: Utc::now(),
        };
        Some(RunTicket {
            gate: Arc::clone(self),
            settled: false,
        })
    }
}

/// Proof of holding the Generating phase. Settle with `finish` or `fail`.
pub struct RunTicket {
    gate: Arc<GenerationGate>,
    settled: bool,
}

impl RunTicket {
    pub fn set_status(&self, status_message: impl Into<String>) {
        let mut state = self.gate.lock();
        state.status_message = status_message.into();
        state.updated_at = Utc::now();
    }

    pub fn finish(mut self, status_message: impl Into<String>) {
        self.settled = true;
        *self.gate.lock() = GenerationState::idle(status_message);
    }

    pub fn fail(mut self, error_message: impl Into<String>) {
        self.settled = true;
        let mut state = self.gate.lock();
        *state = GenerationState {
            phase: Phase::Error,
            status_message: String::new(),
            error_message: Some(error_message.into()),
            updated_at: Utc::now(),
        };
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        if !self.settled {
            *self.gate.lock() = GenerationState::idle("run interrupted");
        }
    }
}
