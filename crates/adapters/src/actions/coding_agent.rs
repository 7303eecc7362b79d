// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `run_coding_agent` — invokes one of the external coding-agent CLIs
//! (`codex`, `claude`, `cline`) as an opaque executable (spec §1: these
//! tools are external collaborators, never interpreted). The agent name
//! selects the binary; the prompt is passed as a single fixed argument,
//! never interpolated into a shell string.

use crew_core::ActionResult;
use std::path::Path;
use std::time::Duration;

const KNOWN_AGENTS: &[&str] = &["codex", "claude", "cline"];

pub async fn run_coding_agent(cwd: &Path, agent_name: &str, prompt: &str, timeout: Duration) -> ActionResult {
    if !KNOWN_AGENTS.contains(&agent_name) {
        return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("unknown coding agent: {agent_name}") };
    }
    let argv = vec![agent_name.to_string(), "-p".to_string(), prompt.to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

#[cfg(test)]
#[path = "coding_agent_tests.rs"]
mod tests;
