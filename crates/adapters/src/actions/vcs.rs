// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `git_status` (AUTO) and `git_commit` (CONFIRM) handlers. Both route
//! through [`crate::process::run`] with a fixed argv — the commit message
//! is passed as a single argument, never interpolated into a shell string.

use crew_core::ActionResult;
use std::path::Path;
use std::time::Duration;

pub async fn git_status(cwd: &Path, timeout: Duration) -> ActionResult {
    let argv = vec!["git".to_string(), "status".to_string(), "--short".to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

pub async fn git_commit(cwd: &Path, message: &str, timeout: Duration) -> ActionResult {
    let argv = vec!["git".to_string(), "commit".to_string(), "-a".to_string(), "-m".to_string(), message.to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

/// `git_push` is `requires_approval` at the skill layer (never
/// `plan_auto_approved`), per the built-in skill set grounding in
/// SPEC_FULL.md — it still routes through the same fixed-argv path.
pub async fn git_push(cwd: &Path, remote: &str, branch: &str, timeout: Duration) -> ActionResult {
    let argv = vec!["git".to_string(), "push".to_string(), remote.to_string(), branch.to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

#[cfg(test)]
#[path = "vcs_tests.rs"]
mod tests;
