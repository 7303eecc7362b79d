// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! SSH shell-tunnel fallback transport, used by `/action` when no Agent
//! is connected (spec §4.1, "Fallback transport").

use async_trait::async_trait;
use crew_core::ActionResult;
use std::time::Duration;

/// `user@host:port` target the fallback executor tunnels to.
#[derive(Debug, Clone)]
pub struct SshTarget {
    pub user: String,
    pub host: String,
    pub port: u16,
}

impl SshTarget {
    pub fn display(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

#[async_trait]
pub trait FallbackExecutor: Send + Sync + 'static {
    /// Runs one action out-of-band over the tunnel, shaping the result
    /// identically to the Agent's own response.
    async fn run(&self, argv: &[String], timeout: Duration) -> ActionResult;

    /// Health check surfaced as `ssh_fallback_healthy` in `GET /status`.
    async fn healthy(&self) -> bool;

    fn target(&self) -> String;
}

/// Shells out to the system `ssh` client with a fixed argument vector —
/// never a caller-built command string.
pub struct SshFallbackExecutor {
    target: SshTarget,
}

impl SshFallbackExecutor {
    pub fn new(target: SshTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl FallbackExecutor for SshFallbackExecutor {
    async fn run(&self, argv: &[String], timeout: Duration) -> ActionResult {
        let mut ssh_argv = vec!["ssh".to_string(), self.target.display(), "--".to_string()];
        ssh_argv.extend(argv.iter().cloned());
        crate::process::run(&ssh_argv, std::path::Path::new("."), timeout).await
    }

    async fn healthy(&self) -> bool {
        let argv = vec!["ssh".to_string(), self.target.display(), "--".to_string(), "true".to_string()];
        let result = crate::process::run(&argv, std::path::Path::new("."), Duration::from_secs(10)).await;
        result.is_success()
    }

    fn target(&self) -> String {
        self.target.display()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::{FallbackExecutor, SshTarget};
    use async_trait::async_trait;
    use crew_core::ActionResult;
    use std::time::Duration;

    /// In-process stand-in for the SSH tunnel, used by gateway tests.
    #[derive(Clone)]
    pub struct FakeFallbackExecutor {
        pub target: String,
        pub healthy: bool,
        pub result: ActionResult,
    }

    impl FakeFallbackExecutor {
        pub fn healthy_with(target: &str, result: ActionResult) -> Self {
            Self { target: target.to_string(), healthy: true, result }
        }

        pub fn unhealthy(target: &str) -> Self {
            Self { target: target.to_string(), healthy: false, result: ActionResult::default() }
        }
    }

    #[async_trait]
    impl FallbackExecutor for FakeFallbackExecutor {
        async fn run(&self, _argv: &[String], _timeout: Duration) -> ActionResult {
            self.result.clone()
        }

        async fn healthy(&self) -> bool {
            self.healthy
        }

        fn target(&self) -> String {
            self.target.clone()
        }
    }

    pub fn target(user: &str, host: &str, port: u16) -> SshTarget {
        SshTarget { user: user.to_string(), host: host.to_string(), port }
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
