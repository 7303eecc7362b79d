// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Chat front-end adapter contract (spec §1/§4.5, peripheral).
//!
//! The real Telegram transport is an external collaborator and out of
//! scope; only the contract it plugs into is implemented here, mirroring
//! `NotifyAdapter`'s shape in the teacher's adapters crate.

use async_trait::async_trait;
use crew_core::ProjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatAdapterError {
    #[error("chat send failed: {0}")]
    SendFailed(String),
}

/// Progress fan-out and approval-prompt contract the Worker drives
/// (spec §4.5 "Progress notification fan-out" / "Approval callback").
#[async_trait]
pub trait ChatAdapter: Send + Sync + 'static {
    /// Delivers one project event. Errors are logged by the caller and
    /// never abort the Worker (spec §4.5, "the worker is not aborted").
    async fn on_progress(&self, project_id: ProjectId, event_type: &str, summary: &str) -> Result<(), ChatAdapterError>;

    /// Renders an approve/deny prompt with a 300s timeout, denying on
    /// expiry (spec §4.5, "Approval callback").
    async fn request_approval(&self, project_id: ProjectId, action: &str, params: &serde_json::Value) -> bool;
}

/// Default wiring used by tests and any binary that has not configured a
/// real transport: logs every event, denies every approval request.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingChatAdapter;

#[async_trait]
impl ChatAdapter for LoggingChatAdapter {
    async fn on_progress(&self, project_id: ProjectId, event_type: &str, summary: &str) -> Result<(), ChatAdapterError> {
        tracing::info!(%project_id, event_type, summary, "project progress (no chat transport configured)");
        Ok(())
    }

    async fn request_approval(&self, project_id: ProjectId, action: &str, params: &serde_json::Value) -> bool {
        tracing::warn!(%project_id, action, %params, "approval requested but no chat transport configured, denying");
        false
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::{ChatAdapter, ChatAdapterError};
    use async_trait::async_trait;
    use crew_core::ProjectId;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct ProgressCall {
        pub project_id: ProjectId,
        pub event_type: String,
        pub summary: String,
    }

    /// Records every `on_progress` call and answers approvals with a
    /// pre-programmed decision.
    #[derive(Clone)]
    pub struct FakeChatAdapter {
        approve: bool,
        events: Arc<Mutex<Vec<ProgressCall>>>,
    }

    impl FakeChatAdapter {
        pub fn new(approve: bool) -> Self {
            Self { approve, events: Arc::new(Mutex::new(Vec::new())) }
        }

        pub fn events(&self) -> Vec<ProgressCall> {
            self.events.lock().clone()
        }
    }

    #[async_trait]
    impl ChatAdapter for FakeChatAdapter {
        async fn on_progress(&self, project_id: ProjectId, event_type: &str, summary: &str) -> Result<(), ChatAdapterError> {
            self.events.lock().push(ProgressCall { project_id, event_type: event_type.to_string(), summary: summary.to_string() });
            Ok(())
        }

        async fn request_approval(&self, _project_id: ProjectId, _action: &str, _params: &serde_json::Value) -> bool {
            self.approve
        }
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
