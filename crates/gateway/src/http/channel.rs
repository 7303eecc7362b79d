// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Action Dispatch Channel's WebSocket route: authenticates the
//! bearer token, then hands the accepted socket to [`ChannelServer`] to
//! drive to completion (spec §4.1).

use crate::state::AppState;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

pub async fn upgrade(State(state): State<AppState>, headers: HeaderMap, ws: WebSocketUpgrade) -> Response {
    match bearer_token(&headers) {
        Some(token) if state.channel_server.authenticate(token) => {
            ws.on_upgrade(move |socket| async move { state.channel_server.run_connection(socket).await })
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
