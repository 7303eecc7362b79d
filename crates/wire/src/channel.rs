// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Message framing for the Action Dispatch Channel between the Gateway
//! (server) and the Local Execution Agent (client). Both directions are
//! JSON messages tagged by `type`, sent over a message-oriented transport
//! (a WebSocket in practice — see `crew-adapters`' channel client/server).

use crew_core::{ActionResponse, Tier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message sent from the Gateway to the Local Execution Agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ActionRequest {
        request_id: String,
        action: String,
        #[serde(default)]
        params: Value,
        #[serde(default)]
        confirmed: bool,
    },
    Control {
        kind: ControlKind,
    },
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    EmergencyStop,
    Resume,
}

/// A message sent from the Local Execution Agent back to the Gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ActionResponse {
        request_id: String,
        #[serde(flatten)]
        response: ActionResponse,
    },
    Pong,
}

impl ServerMessage {
    pub fn action_request(request_id: impl Into<String>, action: impl Into<String>, params: Value, confirmed: bool) -> Self {
        Self::ActionRequest { request_id: request_id.into(), action: action.into(), params, confirmed }
    }

    pub fn emergency_stop() -> Self {
        Self::Control { kind: ControlKind::EmergencyStop }
    }

    pub fn resume() -> Self {
        Self::Control { kind: ControlKind::Resume }
    }
}

impl ClientMessage {
    pub fn action_response(request_id: impl Into<String>, response: ActionResponse) -> Self {
        Self::ActionResponse { request_id: request_id.into(), response }
    }
}

/// Whether a tier requires the Gateway to hold an action for operator
/// approval before it is allowed to carry `confirmed: true` on replay.
pub fn requires_upstream_confirmation(tier: Tier) -> bool {
    matches!(tier, Tier::Confirm)
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
