// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `POST /action`, `POST /emergency-stop`, `POST /resume`, `GET /status`
//! (spec §6). Loopback-only; the network boundary is the auth
//! mechanism for this surface, not a bearer token.

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crew_core::{ActionResponse, IdempotencyKey};
use crew_wire::{ActionRequestBody, EmergencyStopResponse, ResumeResponse, StatusResponse};

/// Each direct HTTP call is its own idempotency scope: a human or
/// external scheduler calling `/action` has no retry semantics of its
/// own to key off, so a fresh per-call id sidesteps a false cache hit
/// from two unrelated calls sharing the same action name and params.
/// The Worker's calls through [`crew_engine::tool_loop`] use the real
/// task id instead, which is what makes cross-retry replay meaningful.
fn fresh_task_id() -> String {
    format!("http-{}", nanoid::nanoid!(12))
}

pub async fn post_action(State(state): State<AppState>, Json(body): Json<ActionRequestBody>) -> Response {
    if body.action.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(ActionResponse::error("malformed request: action name is required"))).into_response();
    }

    if !state.channel.is_agent_connected() && !state.channel.fallback_healthy().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ActionResponse::error("no agent connected and no fallback transport available")),
        )
            .into_response();
    }

    let key = IdempotencyKey::derive(&body.action, &body.params);
    match state.channel.dispatch(&fresh_task_id(), &key, &body.action, body.params, body.confirmed).await {
        Ok(response) => {
            let status = match &response {
                ActionResponse::Error { error } if error == "dispatch_timeout" => StatusCode::GATEWAY_TIMEOUT,
                ActionResponse::Error { error } if error == "no_agent_connected" => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::OK,
            };
            (status, Json(response)).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ActionResponse::error(err))).into_response(),
    }
}

pub async fn post_emergency_stop(State(state): State<AppState>) -> Json<EmergencyStopResponse> {
    state.channel.send_emergency_stop();
    Json(EmergencyStopResponse::default())
}

pub async fn post_resume(State(state): State<AppState>) -> Json<ResumeResponse> {
    state.channel.send_resume();
    Json(ResumeResponse::default())
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        agent_connected: state.channel.is_agent_connected(),
        ssh_fallback_enabled: state.ssh_fallback_enabled,
        ssh_fallback_healthy: state.channel.fallback_healthy().await,
        ssh_fallback_target: state.fallback_target.clone(),
    })
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
