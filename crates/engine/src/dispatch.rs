// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Gateway's dispatch facade: the single entry point `/action` and the
//! Worker call to send an [`crew_core::ActionRequest`] either over the
//! channel to a connected Agent, or through the SSH fallback transport when
//! no Agent is connected (spec §4.1).
//!
//! Every dispatch is idempotent. The caller always supplies a `task_id` and
//! an [`IdempotencyKey`]; a request that has already produced a response for
//! that pair replays the cached [`ActionResponse`] instead of re-executing,
//! whether the retry arrives because the Worker crashed mid-wait or because
//! a network blip made the Gateway's own call look like a failure.

use crew_adapters::{ChannelServer, FallbackExecutor};
use crew_core::{ActionError, ActionResponse, ActionResult, IdempotencyKey, IdempotencyRecord};
use crew_storage::Store;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("action error: {0}")]
    Action(#[from] ActionError),
    #[error("storage error: {0}")]
    Storage(#[from] crew_storage::StorageError),
}

/// Wraps the channel server and the fallback transport behind one call,
/// and owns the idempotency cache that sits in front of both.
pub struct ChannelHandle<F: FallbackExecutor> {
    server: ChannelServer,
    fallback: Arc<F>,
    fallback_timeout: Duration,
    store: Arc<Store>,
}

impl<F: FallbackExecutor> ChannelHandle<F> {
    pub fn new(server: ChannelServer, fallback: Arc<F>, fallback_timeout: Duration, store: Arc<Store>) -> Self {
        Self { server, fallback, fallback_timeout, store }
    }

    pub fn is_agent_connected(&self) -> bool {
        self.server.is_agent_connected()
    }

    pub async fn fallback_healthy(&self) -> bool {
        self.fallback.healthy().await
    }

    /// Sends one action for a task, replaying a cached response for a
    /// repeated `(task_id, idempotency_key)` instead of dispatching again.
    pub async fn dispatch(
        &self,
        task_id: &str,
        key: &IdempotencyKey,
        action_name: &str,
        params: serde_json::Value,
        confirmed: bool,
    ) -> Result<ActionResponse, DispatchError> {
        if let Some(cached) = self.store.get_idempotency_record(task_id, key)? {
            return Ok(serde_json::from_value(cached.response_json)
                .unwrap_or_else(|_| ActionResponse::error(ActionError::Internal { reason: "corrupt idempotency cache entry".into() })));
        }

        let response = if self.server.is_agent_connected() {
            self.server.send_action(action_name, params, confirmed).await.unwrap_or_else(ActionResponse::from)
        } else {
            self.dispatch_via_fallback(action_name, &params).await
        };

        let response_json = serde_json::to_value(&response)
            .unwrap_or_else(|_| serde_json::json!({"status": "error", "error": "internal: unencodable response"}));
        let record = IdempotencyRecord {
            task_id: task_id.to_string(),
            idempotency_key: key.clone(),
            response_json,
            created_at: chrono::Utc::now(),
        };
        self.store.insert_idempotency_record(&record)?;

        Ok(response)
    }

    async fn dispatch_via_fallback(&self, action_name: &str, params: &serde_json::Value) -> ActionResponse {
        let argv = match fallback_argv(action_name, params) {
            Ok(argv) => argv,
            Err(reason) => return ActionResponse::from(ActionError::ValidationFailed { reason }),
        };
        let result: ActionResult = self.fallback.run(&argv, self.fallback_timeout).await;
        ActionResponse::ok(action_name, result)
    }

    pub fn send_emergency_stop(&self) {
        self.server.send_control(crew_wire::ControlKind::EmergencyStop);
    }

    pub fn send_resume(&self) {
        self.server.send_control(crew_wire::ControlKind::Resume);
    }
}

/// Builds the fixed argv the fallback transport runs remotely. The SSH
/// fallback has no access to the Agent's own registry, so only the subset
/// of actions with a stable, params-to-argv mapping are supported; anything
/// else is rejected rather than guessed at.
fn fallback_argv(action_name: &str, params: &serde_json::Value) -> Result<Vec<String>, String> {
    let get = |key: &str| -> Result<String, String> {
        params.get(key).and_then(|v| v.as_str()).map(str::to_string).ok_or_else(|| format!("missing param: {key}"))
    };
    match action_name {
        "git_status" => Ok(vec!["git".into(), "status".into(), "--porcelain".into()]),
        "git_commit" => Ok(vec!["git".into(), "commit".into(), "-am".into(), get("message")?]),
        "run_tests" => Ok(vec![get("runner")?]),
        "build_project" => Ok(vec![get("build_tool")?, "build".into()]),
        other => Err(format!("fallback transport has no mapping for {other}")),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
