// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `run_tests`, `lint_project`, `build_project`, `install_dependencies`,
//! `start_dev_server` — each takes a `runner`/`linter`/`build_tool`/
//! `manager` parameter selecting between two fixed tool invocations,
//! never free text (spec §4.2 Security Kernel supplement).

use crew_core::ActionResult;
use std::path::Path;
use std::time::Duration;

fn argv_for(table: &[(&str, &[&str])], selector: &str) -> Option<Vec<String>> {
    table.iter().find(|(name, _)| *name == selector).map(|(_, argv)| argv.iter().map(|s| s.to_string()).collect())
}

pub async fn run_tests(cwd: &Path, runner: &str, timeout: Duration) -> ActionResult {
    const TABLE: &[(&str, &[&str])] = &[("pytest", &["pytest", "-q"]), ("npm", &["npm", "test", "--silent"])];
    run_selected(cwd, TABLE, runner, timeout).await
}

pub async fn lint_project(cwd: &Path, linter: &str, timeout: Duration) -> ActionResult {
    const TABLE: &[(&str, &[&str])] = &[("ruff", &["ruff", "check", "."]), ("eslint", &["eslint", "."])];
    run_selected(cwd, TABLE, linter, timeout).await
}

pub async fn build_project(cwd: &Path, build_tool: &str, timeout: Duration) -> ActionResult {
    const TABLE: &[(&str, &[&str])] = &[("make", &["make", "build"]), ("npm", &["npm", "run", "build"])];
    run_selected(cwd, TABLE, build_tool, timeout).await
}

pub async fn install_dependencies(cwd: &Path, manager: &str, timeout: Duration) -> ActionResult {
    const TABLE: &[(&str, &[&str])] = &[("pip", &["pip", "install", "-r", "requirements.txt"]), ("npm", &["npm", "install"])];
    run_selected(cwd, TABLE, manager, timeout).await
}

/// Starts a dev server in the background and returns immediately —
/// dev servers don't exit on their own, so the handler reports the pid
/// rather than waiting on the process.
pub async fn start_dev_server(cwd: &Path, runner: &str) -> ActionResult {
    const TABLE: &[(&str, &[&str])] = &[("npm", &["npm", "run", "dev"]), ("python", &["python", "manage.py", "runserver"])];
    let Some(argv) = argv_for(TABLE, runner) else {
        return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("unknown runner: {runner}") };
    };
    let Some((program, args)) = argv.split_first() else {
        return ActionResult { returncode: -1, stdout: String::new(), stderr: "empty argv".to_string() };
    };
    match tokio::process::Command::new(program).args(args).current_dir(cwd).spawn() {
        Ok(child) => {
            let pid = child.id().unwrap_or(0);
            ActionResult::success(format!("started dev server pid={pid}"), "")
        }
        Err(e) => ActionResult { returncode: -1, stdout: String::new(), stderr: format!("spawn failed: {e}") },
    }
}

async fn run_selected(cwd: &Path, table: &[(&str, &[&str])], selector: &str, timeout: Duration) -> ActionResult {
    match argv_for(table, selector) {
        Some(argv) => crate::process::run(&argv, cwd, timeout).await,
        None => ActionResult { returncode: -1, stdout: String::new(), stderr: format!("unknown tool: {selector}") },
    }
}

#[cfg(test)]
#[path = "build_tools_tests.rs"]
mod tests;
