// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Operator confirmation for CONFIRM-tier actions (spec §4.2 step 7).
//!
//! The Agent can either block on a terminal prompt or let the caller pass
//! `requires_confirmation` back up so the Gateway renders its own approval
//! UI. This module implements the terminal prompt path.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Operator confirm prompts wait at most this long before defaulting to deny
/// (spec §5, "Operator CONFIRM prompt" timeout).
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(300);

#[async_trait]
pub trait OperatorConfirm: Send + Sync + 'static {
    /// Prompts the operator with a yes/no question, returning `false` if
    /// they decline or the prompt times out.
    async fn confirm(&self, action: &str, summary: &str) -> bool;
}

/// Blocks on stdin for a `y`/`n` answer, defaulting to deny on timeout or EOF.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalConfirm;

#[async_trait]
impl OperatorConfirm for TerminalConfirm {
    async fn confirm(&self, action: &str, summary: &str) -> bool {
        println!("CONFIRM [{action}]: {summary} (y/N)? ");
        let prompt = async {
            let stdin = tokio::io::stdin();
            let mut reader = BufReader::new(stdin);
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) => false,
                Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(_) => false,
            }
        };
        tokio::time::timeout(CONFIRM_TIMEOUT, prompt).await.unwrap_or(false)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::OperatorConfirm;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A confirm adapter with a fixed, pre-programmed answer; every call is
    /// recorded so tests can assert how many prompts were issued.
    #[derive(Clone, Default)]
    pub struct FakeConfirm {
        answer: bool,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl FakeConfirm {
        pub fn always(answer: bool) -> Self {
            Self { answer, calls: Arc::new(Mutex::new(Vec::new())) }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl OperatorConfirm for FakeConfirm {
        async fn confirm(&self, action: &str, summary: &str) -> bool {
            self.calls.lock().push((action.to_string(), summary.to_string()));
            self.answer
        }
    }
}

#[cfg(test)]
#[path = "confirm_tests.rs"]
mod tests;
