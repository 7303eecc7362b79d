// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Local Execution Agent: dials into the Gateway's Action Dispatch
//! Channel and runs every validated action locally (spec §4/§5). Holds
//! the emergency-stop latch and rate limiter; the Gateway never executes
//! anything itself.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;

use config::AgentConfig;
use crew_adapters::{AuditLog, ChannelClient, ClientEvent, TerminalConfirm};
use crew_core::ActionRequest;
use crew_engine::registry::ActionRegistry;
use crew_engine::validator::{BuiltinDispatch, Validator, ValidatorConfig};
use crew_engine::ControlState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("agent: configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "agent exited with an error");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let control = Arc::new(ControlState::with_initial_stop(config.rate_limit_per_minute, config.initial_emergency_stop));
    let audit = AuditLog::open(&config.audit_log_dir, &config.audit_log_file)?;
    let validator_config = ValidatorConfig {
        project_dir: config.project_dir.clone(),
        allowed_roots: config.allowed_roots.clone(),
        default_timeout: config.default_timeout,
    };
    let validator =
        Arc::new(Validator::new(control.clone(), ActionRegistry::default(), validator_config, TerminalConfirm, audit, BuiltinDispatch));

    let (client, mut events) = ChannelClient::new();
    let client_for_loop = client.clone();

    let dispatch_loop = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ClientEvent::ActionRequest { request_id, action, params, confirmed } => {
                    let validator = validator.clone();
                    let client = client_for_loop.clone();
                    tokio::spawn(async move {
                        let mut request = ActionRequest::new(request_id.clone(), action, params);
                        if confirmed {
                            request = request.confirm();
                        }
                        let response = match validator.validate_and_execute(&request).await {
                            Ok(result) => crew_core::ActionResponse::ok(request.action_name.clone(), result),
                            Err(err) => crew_core::ActionResponse::from(err),
                        };
                        client.send_response(request_id, response);
                    });
                }
                ClientEvent::Control(crew_wire::ControlKind::EmergencyStop) => {
                    tracing::warn!("emergency stop received");
                    control.stop();
                }
                ClientEvent::Control(crew_wire::ControlKind::Resume) => {
                    tracing::info!("resume received");
                    control.resume();
                }
                ClientEvent::Connected => tracing::info!("connected to gateway"),
                ClientEvent::Disconnected => tracing::warn!("disconnected from gateway, will retry"),
            }
        }
    });

    tracing::info!(gateway = %config.gateway_url, "agent starting");
    client.run(&config.gateway_url, &config.auth_token).await;
    dispatch_loop.abort();
    Ok(())
}
