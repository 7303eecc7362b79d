// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Local Agent-side half of the Action Dispatch Channel (spec §4.1).
//!
//! Connects to the Gateway's WebSocket endpoint with a bearer token,
//! answers `ping` with `pong`, and hands every `action_request`/`control`
//! frame to the caller over an unbounded channel. Reconnects with
//! exponential backoff (5s → 120s), reset on a successful auth.

use crew_core::ActionResponse;
use crew_wire::{ClientMessage, ControlKind, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

pub const INITIAL_BACKOFF: Duration = Duration::from_secs(5);
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// An inbound frame surfaced to the Agent's dispatch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    ActionRequest { request_id: String, action: String, params: Value, confirmed: bool },
    Control(ControlKind),
    Connected,
    Disconnected,
}

struct Shared {
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

#[derive(Clone)]
pub struct ChannelClient {
    shared: Arc<Shared>,
}

impl ChannelClient {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { shared: Arc::new(Shared { outbound: Mutex::new(None), events }) }, rx)
    }

    /// Sends the queued response for `request_id` on the currently-live
    /// connection, if any. Silently dropped if the connection has since
    /// gone away — outstanding server-side requests simply time out.
    pub fn send_response(&self, request_id: impl Into<String>, response: ActionResponse) {
        let wire = ClientMessage::action_response(request_id, response);
        let Ok(text) = serde_json::to_string(&wire) else { return };
        if let Some(tx) = self.shared.outbound.lock().as_ref() {
            let _ = tx.send(Message::Text(text));
        }
    }

    /// Runs the reconnect loop forever. Exits only if `gateway_url` never
    /// parses as a request (a fatal configuration error).
    pub async fn run(&self, gateway_url: &str, auth_token: &str) {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.connect_once(gateway_url, auth_token).await {
                Ok(()) => {
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) => {
                    warn!(error = %e, "channel connect failed");
                }
            }
            *self.shared.outbound.lock() = None;
            let _ = self.shared.events.send(ClientEvent::Disconnected);
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    async fn connect_once(&self, gateway_url: &str, auth_token: &str) -> Result<(), String> {
        let mut request = gateway_url.into_client_request().map_err(|e| e.to_string())?;
        request
            .headers_mut()
            .insert(AUTHORIZATION, format!("Bearer {auth_token}").parse().map_err(|_| "invalid auth header".to_string())?);

        let (ws_stream, _) = tokio_tungstenite::connect_async(request).await.map_err(|e| e.to_string())?;
        info!("channel connected");
        let (mut sink, mut stream) = ws_stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        *self.shared.outbound.lock() = Some(outbound_tx);
        let _ = self.shared.events.send(ClientEvent::Connected);

        let writer = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
        });

        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => self.handle_server_text(&text),
                Ok(Message::Ping(payload)) => {
                    if let Some(tx) = self.shared.outbound.lock().as_ref() {
                        let _ = tx.send(Message::Pong(payload));
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "channel read error");
                    break;
                }
            }
        }

        writer.abort();
        Ok(())
    }

    fn handle_server_text(&self, text: &str) {
        let Ok(parsed) = serde_json::from_str::<ServerMessage>(text) else {
            warn!("received unparseable server frame");
            return;
        };
        match parsed {
            ServerMessage::ActionRequest { request_id, action, params, confirmed } => {
                let _ = self.shared.events.send(ClientEvent::ActionRequest { request_id, action, params, confirmed });
            }
            ServerMessage::Control { kind } => {
                let _ = self.shared.events.send(ClientEvent::Control(kind));
            }
            ServerMessage::Ping => {
                if let Some(tx) = self.shared.outbound.lock().as_ref() {
                    let pong = ClientMessage::Pong;
                    if let Ok(text) = serde_json::to_string(&pong) {
                        let _ = tx.send(Message::Text(text));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
