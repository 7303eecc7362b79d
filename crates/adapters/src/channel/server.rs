// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Gateway-side half of the Action Dispatch Channel (spec §4.1).
//!
//! One axum WebSocket route accepts the Local Agent's connection. Auth is
//! a bearer token compared in constant time; a second successful auth
//! supersedes whatever connection was previously open. A correlation
//! table maps outstanding `request_id`s to the future their response
//! resolves, with a 120s default timeout.

use axum::extract::ws::{Message, WebSocket};
use crew_core::{ActionError, ActionResponse};
use crew_wire::{ClientMessage, ControlKind, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Server waits this long for an `action_response` before failing the
/// correlated future with `ActionError::DispatchTimeout` (spec §4.1).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_GRACE: Duration = Duration::from_secs(10);

enum ConnState {
    Disconnected,
    Connected { outbound: mpsc::UnboundedSender<Message>, generation: u64 },
}

struct Shared {
    auth_token: String,
    state: Mutex<ConnState>,
    pending: Mutex<HashMap<String, oneshot::Sender<ActionResponse>>>,
    next_generation: AtomicU64,
    /// Last time either a WebSocket-protocol pong or an application-level
    /// `ClientMessage::Pong` frame arrived, reset at the start of each
    /// connection; the keepalive task reads this to decide whether the
    /// Agent is still alive.
    last_pong: Mutex<tokio::time::Instant>,
}

/// Handle shared by the HTTP dispatch layer and the WebSocket route.
#[derive(Clone)]
pub struct ChannelServer {
    shared: Arc<Shared>,
}

impl ChannelServer {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                auth_token: auth_token.into(),
                state: Mutex::new(ConnState::Disconnected),
                pending: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                last_pong: Mutex::new(tokio::time::Instant::now()),
            }),
        }
    }

    /// Constant-time bearer-token comparison (spec §4.1, "Authentication").
    pub fn authenticate(&self, bearer: &str) -> bool {
        let expected = self.shared.auth_token.as_bytes();
        let actual = bearer.as_bytes();
        expected.len() == actual.len() && bool::from(expected.ct_eq(actual))
    }

    pub fn is_agent_connected(&self) -> bool {
        matches!(*self.shared.state.lock(), ConnState::Connected { .. })
    }

    /// Runs one accepted WebSocket connection to completion. Supersedes
    /// any previously-connected agent before taking over as the current one.
    pub async fn run_connection(&self, socket: WebSocket) {
        let generation = self.shared.next_generation.fetch_add(1, Ordering::SeqCst);
        let (mut sink, mut stream) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        {
            let mut state = self.shared.state.lock();
            if let ConnState::Connected { outbound, .. } = &*state {
                let _ = outbound.send(Message::Close(None));
            }
            *state = ConnState::Connected { outbound: outbound_tx.clone(), generation };
        }
        info!(generation, "agent connected, superseding any prior connection");
        *self.shared.last_pong.lock() = tokio::time::Instant::now();

        let writer_task = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let shared = self.shared.clone();
        let keepalive_tx = outbound_tx.clone();
        let keepalive_task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(PING_INTERVAL).await;
                if keepalive_tx.send(ping_message()).is_err() {
                    break;
                }
                tokio::time::sleep(PONG_GRACE).await;
                if shared.last_pong.lock().elapsed() > PING_INTERVAL {
                    warn!("no pong within grace period, closing connection");
                    let mut state = shared.state.lock();
                    if matches!(&*state, ConnState::Connected { generation: g, .. } if *g == generation) {
                        *state = ConnState::Disconnected;
                    }
                    break;
                }
            }
        });

        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => self.handle_client_text(&text),
                Message::Pong(_) => *self.shared.last_pong.lock() = tokio::time::Instant::now(),
                Message::Close(_) => break,
                _ => {}
            }
        }

        keepalive_task.abort();
        writer_task.abort();

        let mut state = self.shared.state.lock();
        if matches!(&*state, ConnState::Connected { generation: g, .. } if *g == generation) {
            *state = ConnState::Disconnected;
            info!(generation, "agent disconnected");
        }
        self.fail_all_pending(ActionError::NoAgentConnected);
    }

    fn handle_client_text(&self, text: &str) {
        let Ok(parsed) = serde_json::from_str::<ClientMessage>(text) else {
            warn!("received unparseable client frame");
            return;
        };
        match parsed {
            ClientMessage::ActionResponse { request_id, response } => {
                if let Some(tx) = self.shared.pending.lock().remove(&request_id) {
                    let _ = tx.send(response);
                }
            }
            ClientMessage::Pong => *self.shared.last_pong.lock() = tokio::time::Instant::now(),
        }
    }

    fn fail_all_pending(&self, _err: ActionError) {
        let pending: Vec<_> = self.shared.pending.lock().drain().collect();
        for (_, tx) in pending {
            let _ = tx.send(ActionResponse::error(ActionError::NoAgentConnected));
        }
    }

    /// Dispatches one action over the channel, correlating on a fresh
    /// `request_id`. Returns `NoAgentConnected` if no agent is connected,
    /// `DispatchTimeout` if 120s pass without a response.
    pub async fn send_action(&self, action: &str, params: serde_json::Value, confirmed: bool) -> Result<ActionResponse, ActionError> {
        let request_id = format!("req-{}", nanoid::nanoid!(16));
        let (tx, rx) = oneshot::channel();

        let outbound = {
            let state = self.shared.state.lock();
            match &*state {
                ConnState::Connected { outbound, .. } => outbound.clone(),
                ConnState::Disconnected => return Err(ActionError::NoAgentConnected),
            }
        };

        self.shared.pending.lock().insert(request_id.clone(), tx);

        let wire = ServerMessage::action_request(request_id.clone(), action, params, confirmed);
        let Ok(text) = serde_json::to_string(&wire) else {
            self.shared.pending.lock().remove(&request_id);
            return Err(ActionError::Internal { reason: "failed to encode action_request".to_string() });
        };

        if outbound.send(Message::Text(text)).is_err() {
            self.shared.pending.lock().remove(&request_id);
            return Err(ActionError::NoAgentConnected);
        }

        match tokio::time::timeout(REQUEST_TIMEOUT, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ActionError::NoAgentConnected),
            Err(_) => {
                self.shared.pending.lock().remove(&request_id);
                Err(ActionError::DispatchTimeout)
            }
        }
    }

    /// Sends a one-way control message; no response is expected.
    pub fn send_control(&self, kind: ControlKind) {
        let state = self.shared.state.lock();
        if let ConnState::Connected { outbound, .. } = &*state {
            let wire = ServerMessage::Control { kind };
            if let Ok(text) = serde_json::to_string(&wire) {
                let _ = outbound.send(Message::Text(text));
            }
        }
    }
}

fn ping_message() -> Message {
    let wire = ServerMessage::Ping;
    Message::Text(serde_json::to_string(&wire).unwrap_or_default())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
