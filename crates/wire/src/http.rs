// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! DTOs for the Gateway's loopback-only control-plane HTTP surface:
//! `POST /action`, `POST /emergency-stop`, `POST /resume`, `GET /status`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequestBody {
    pub action: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyStopResponse {
    pub status: &'static str,
}

impl Default for EmergencyStopResponse {
    fn default() -> Self {
        Self { status: "emergency_stop_sent" }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeResponse {
    pub status: &'static str,
}

impl Default for ResumeResponse {
    fn default() -> Self {
        Self { status: "resume_sent" }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub agent_connected: bool,
    pub ssh_fallback_enabled: bool,
    pub ssh_fallback_healthy: bool,
    pub ssh_fallback_target: String,
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
