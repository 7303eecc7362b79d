// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `docker_build` and `docker_compose_up` (both CONFIRM-tier). The build
//! tag is validated against a regex before the process is ever spawned.

use crew_core::ActionResult;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._/:@-]+$").expect("static regex"))
}

/// Spec §8 boundary case: a docker tag containing a space is rejected.
pub fn is_valid_docker_tag(tag: &str) -> bool {
    !tag.is_empty() && tag_pattern().is_match(tag)
}

pub async fn docker_build(cwd: &Path, tag: &str, timeout: Duration) -> ActionResult {
    if !is_valid_docker_tag(tag) {
        return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("invalid docker tag: {tag}") };
    }
    let argv = vec!["docker".to_string(), "build".to_string(), "-t".to_string(), tag.to_string(), ".".to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

pub async fn docker_compose_up(cwd: &Path, timeout: Duration) -> ActionResult {
    let argv = vec!["docker".to_string(), "compose".to_string(), "up".to_string(), "-d".to_string()];
    crate::process::run(&argv, cwd, timeout).await
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
