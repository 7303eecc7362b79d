// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Gateway process: the human/external-facing half of Crewline's
//! split-process design (spec §4). Owns storage, provider routing, the
//! Action Dispatch Channel server, and the loopback control plane; the
//! Agent connects to it over the channel and does the actual filesystem
//! and process work.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod fallback;
mod http;
mod state;

use config::GatewayConfig;
use crew_adapters::ChannelServer;
use crew_engine::dispatch::ChannelHandle;
use crew_engine::provider::{HttpProvider, Provider, ProviderRouter};
use crew_engine::skills::SkillRegistry;
use crew_engine::tool_loop::ToolLoop;
use crew_engine::PauseGateRegistry;
use crew_storage::Store;
use state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gateway: configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "gateway exited with an error");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let store = Arc::new(Store::open(&config.store_path)?);
    let channel_server = ChannelServer::new(config.auth_token.clone());

    let (fallback, ssh_fallback_enabled) = fallback::build(&config);
    let fallback_target = fallback.target();

    let channel = Arc::new(ChannelHandle::new(channel_server.clone(), Arc::new(fallback), config.fallback_timeout, store.clone()));

    let providers: Vec<Arc<dyn Provider>> = config
        .providers
        .iter()
        .map(|p| {
            Arc::new(HttpProvider::new(
                p.name.clone(),
                p.model.clone(),
                p.context_window,
                p.class,
                p.daily_request_limit,
                p.endpoint.clone(),
                p.api_key.clone(),
            )) as Arc<dyn Provider>
        })
        .collect();
    let router = Arc::new(ProviderRouter::new(providers, store.clone()));

    let skills = Arc::new(SkillRegistry::default());
    let pause_gates = Arc::new(PauseGateRegistry::default());

    let chat = Arc::new(crew_adapters::LoggingChatAdapter) as Arc<dyn crew_adapters::ChatAdapter>;
    let tool_loop = Arc::new(ToolLoop::new(router.clone(), skills.clone(), channel.clone(), store.clone(), chat));

    let state = AppState::new(
        channel_server,
        channel,
        store,
        router,
        skills,
        tool_loop,
        pause_gates,
        ssh_fallback_enabled,
        fallback_target,
        None,
    );

    let control_plane = tokio::spawn(serve(config.control_plane_addr, http::control_plane_router(state.clone())));
    let action_channel = tokio::spawn(serve(config.channel_addr, http::channel_router(state)));

    tracing::info!(control_plane = %config.control_plane_addr, channel = %config.channel_addr, "gateway listening");

    tokio::try_join!(flatten(control_plane), flatten(action_channel))?;
    Ok(())
}

async fn serve(addr: std::net::SocketAddr, router: axum::Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

async fn flatten(handle: tokio::task::JoinHandle<anyhow::Result<()>>) -> anyhow::Result<()> {
    match handle.await {
        Ok(result) => result,
        Err(join_err) => Err(join_err.into()),
    }
}
