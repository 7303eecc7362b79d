// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Shared application state for both the control-plane HTTP surface and
//! the Action Dispatch Channel's WebSocket route. Mirrors the teacher's
//! `ListenCtx` pattern: one struct, constructed once in `main`, cloned
//! (cheaply, via `Arc`) into every handler.

use crate::fallback::DynFallback;
use crew_adapters::{ChannelServer, ChatAdapter, LoggingChatAdapter};
use crew_core::ProjectId;
use crew_engine::dispatch::ChannelHandle;
use crew_engine::project::{AgentBuilder, Worker};
use crew_engine::provider::ProviderRouter;
use crew_engine::skills::SkillRegistry;
use crew_engine::tool_loop::ToolLoop;
use crew_engine::PauseGateRegistry;
use crew_storage::Store;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

pub struct Inner {
    pub channel_server: ChannelServer,
    pub channel: Arc<ChannelHandle<DynFallback>>,
    pub store: Arc<Store>,
    pub router: Arc<ProviderRouter>,
    pub skills: Arc<SkillRegistry>,
    pub tool_loop: Arc<ToolLoop<DynFallback>>,
    pub worker: Arc<Worker<DynFallback>>,
    pub pause_gates: Arc<PauseGateRegistry>,
    pub ssh_fallback_enabled: bool,
    pub fallback_target: String,
    /// Join handles of in-flight `Worker::run_project` calls, keyed by
    /// project id, so the API can report "already running" instead of
    /// starting a second worker loop over the same project.
    pub running_projects: AsyncMutex<std::collections::HashMap<ProjectId, JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct AppState(pub Arc<Inner>);

impl std::ops::Deref for AppState {
    type Target = Inner;

    fn deref(&self) -> &Inner {
        &self.0
    }
}

#[allow(clippy::too_many_arguments)]
impl AppState {
    pub fn new(
        channel_server: ChannelServer,
        channel: Arc<ChannelHandle<DynFallback>>,
        store: Arc<Store>,
        router: Arc<ProviderRouter>,
        skills: Arc<SkillRegistry>,
        tool_loop: Arc<ToolLoop<DynFallback>>,
        pause_gates: Arc<PauseGateRegistry>,
        ssh_fallback_enabled: bool,
        fallback_target: String,
        agent_builder: Option<AgentBuilder>,
    ) -> Self {
        let chat = Arc::new(LoggingChatAdapter) as Arc<dyn ChatAdapter>;
        let mut worker = Worker::new(store.clone(), tool_loop.clone(), chat, pause_gates.clone());
        if let Some(builder) = agent_builder {
            worker = worker.with_agent_builder(builder);
        }
        Self(Arc::new(Inner {
            channel_server,
            channel,
            store,
            router,
            skills,
            tool_loop,
            worker: Arc::new(worker),
            pause_gates,
            ssh_fallback_enabled,
            fallback_target,
            running_projects: AsyncMutex::new(std::collections::HashMap::new()),
        }))
    }
}
