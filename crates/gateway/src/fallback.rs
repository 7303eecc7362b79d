// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Resolves the Gateway's single [`FallbackExecutor`] at boot: either the
//! real SSH tunnel or a stub that reports itself unhealthy, so
//! [`crew_engine::dispatch::ChannelHandle`] (fixed over one `F` type
//! parameter) can be built the same way regardless of whether
//! `SSH_FALLBACK_TARGET` was configured.

use crate::config::GatewayConfig;
use async_trait::async_trait;
use crew_adapters::{FallbackExecutor, SshFallbackExecutor, SshTarget};
use crew_core::ActionResult;
use std::sync::Arc;
use std::time::Duration;

/// Reports itself unhealthy and fails every run, used when no
/// `SSH_FALLBACK_TARGET` is configured.
pub struct NoFallback;

#[async_trait]
impl FallbackExecutor for NoFallback {
    async fn run(&self, _argv: &[String], _timeout: Duration) -> ActionResult {
        ActionResult { returncode: -1, stdout: String::new(), stderr: "ssh fallback transport not configured".to_string() }
    }

    async fn healthy(&self) -> bool {
        false
    }

    fn target(&self) -> String {
        String::new()
    }
}

/// Forwards to a boxed [`FallbackExecutor`] so the concrete choice (SSH
/// tunnel vs. [`NoFallback`]) is a runtime decision instead of a generic
/// parameter threaded through every caller.
pub struct DynFallback(pub Arc<dyn FallbackExecutor>);

#[async_trait]
impl FallbackExecutor for DynFallback {
    async fn run(&self, argv: &[String], timeout: Duration) -> ActionResult {
        self.0.run(argv, timeout).await
    }

    async fn healthy(&self) -> bool {
        self.0.healthy().await
    }

    fn target(&self) -> String {
        self.0.target()
    }
}

pub fn build(config: &GatewayConfig) -> (DynFallback, bool) {
    match &config.ssh_fallback {
        Some(ssh) => {
            let target = SshTarget { user: ssh.user.clone(), host: ssh.host.clone(), port: ssh.port };
            (DynFallback(Arc::new(SshFallbackExecutor::new(target))), true)
        }
        None => (DynFallback(Arc::new(NoFallback)), false),
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
