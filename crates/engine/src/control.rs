// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! A single control object carrying the emergency-stop latch, the rate
//! limiter, and the per-project pause gates, instead of scattering
//! process-wide mutable globals across the agent.

use crate::rate_limit::RateLimiter;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared mutable agent-side state: the emergency-stop latch and the
/// rate limiter every inbound action request is checked against.
pub struct ControlState {
    emergency_stop: AtomicBool,
    pub rate_limiter: RateLimiter,
}

impl ControlState {
    pub fn new(requests_per_minute: u32) -> Self {
        Self { emergency_stop: AtomicBool::new(false), rate_limiter: RateLimiter::new(requests_per_minute) }
    }

    /// Seeds the initial latch state from `EMERGENCY_STOP` config.
    pub fn with_initial_stop(requests_per_minute: u32, initial_stop: bool) -> Self {
        let state = Self::new(requests_per_minute);
        state.emergency_stop.store(initial_stop, Ordering::SeqCst);
        state
    }

    pub fn is_stopped(&self) -> bool {
        self.emergency_stop.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.emergency_stop.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.emergency_stop.store(false, Ordering::SeqCst);
    }
}

/// A per-project cancel flag and pause gate for the Worker. Setting
/// cancel is idempotent; pausing blocks the worker at the next task
/// boundary until `resume()` is called.
#[derive(Clone)]
pub struct PauseGate {
    cancelled: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl PauseGate {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)), paused: Arc::new(AtomicBool::new(false)), notify: Arc::new(Notify::new()) }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Blocks until `resume()` or `cancel()` is called, if currently paused.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_cancelled() {
            self.notify.notified().await;
        }
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of pause gates keyed by project id, owned by the Worker pool.
#[derive(Default)]
pub struct PauseGateRegistry {
    gates: Mutex<HashMap<String, PauseGate>>,
}

impl PauseGateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate_for(&self, project_id: &str) -> PauseGate {
        self.gates.lock().entry(project_id.to_string()).or_insert_with(PauseGate::new).clone()
    }

    pub fn remove(&self, project_id: &str) {
        self.gates.lock().remove(project_id);
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
