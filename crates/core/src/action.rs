// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Action dispatch domain types, shared by the Gateway's HTTP surface,
//! the channel wire framing, and the Agent's validator pipeline.
//!
//! These types are transport-agnostic: `crew-wire` wraps them in the
//! channel's tagged message envelope and the loopback HTTP DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A request to run a named action with parameters, dispatched from the
/// Gateway to the Agent over the channel (or the fallback transport).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub request_id: String,
    pub action_name: String,
    #[serde(default)]
    pub params: Value,
    /// Set by the caller once an operator has approved a CONFIRM-tier action.
    #[serde(default)]
    pub confirmed: bool,
}

impl ActionRequest {
    pub fn new(request_id: impl Into<String>, action_name: impl Into<String>, params: Value) -> Self {
        Self { request_id: request_id.into(), action_name: action_name.into(), params, confirmed: false }
    }

    pub fn confirm(mut self) -> Self {
        self.confirmed = true;
        self
    }
}

/// The raw outcome of a subprocess invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResult {
    pub returncode: i32,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl ActionResult {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { returncode: 0, stdout: stdout.into(), stderr: stderr.into() }
    }

    pub fn is_success(&self) -> bool {
        self.returncode == 0
    }
}

/// The classification errors the validator pipeline and dispatch path can
/// produce; `Display` yields the wire string used in
/// `{"status":"error","error":"..."}`.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    #[error("blocked")]
    Blocked,
    #[error("emergency_stop")]
    EmergencyStop,
    #[error("rate_limited")]
    RateLimited,
    #[error("unknown_action")]
    UnknownAction,
    #[error("path_denied")]
    PathDenied,
    #[error("validation_failed: {reason}")]
    ValidationFailed { reason: String },
    #[error("confirmation_required")]
    ConfirmationRequired,
    #[error("confirmation_denied")]
    ConfirmationDenied,
    #[error("confirmation_timeout")]
    ConfirmationTimeout,
    #[error("timeout")]
    Timeout,
    #[error("no_agent_connected")]
    NoAgentConnected,
    #[error("dispatch_timeout")]
    DispatchTimeout,
    #[error("internal: {reason}")]
    Internal { reason: String },
}

/// The response returned over `POST /action`, framed as
/// `{"status":"ok", ...}` or `{"status":"error", "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResponse {
    Ok { action: String, result: ActionResult },
    Error { error: String },
}

impl ActionResponse {
    pub fn ok(action: impl Into<String>, result: ActionResult) -> Self {
        Self::Ok { action: action.into(), result }
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error { error: err.to_string() }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResponse::Ok { .. })
    }
}

impl From<ActionError> for ActionResponse {
    fn from(err: ActionError) -> Self {
        ActionResponse::error(err)
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
