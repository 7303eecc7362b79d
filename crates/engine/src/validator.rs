// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Agent's validator pipeline: every inbound [`ActionRequest`] passes
//! through, in order, the emergency-stop latch, the rate limiter, a
//! registry lookup, tier classification, the path jail, parameter
//! validation, operator confirmation, execution, and an audit write.
//!
//! A request rejected at any earlier step never reaches the handler and
//! is still audited — the log records attempts, not just successes.

use crate::control::ControlState;
use crate::registry::ActionRegistry;
use async_trait::async_trait;
use chrono::Utc;
use crew_adapters::{actions, AuditLog, AuditRecord, OperatorConfirm};
use crew_core::{ActionError, ActionRequest, ActionResult, Tier};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub project_dir: PathBuf,
    pub allowed_roots: Vec<PathBuf>,
    pub default_timeout: Duration,
}

/// Implemented by a running action executor so the validator can remain
/// agnostic of how a specific action's handler is invoked, which keeps
/// [`Validator`] free of a hardcoded match over every action name.
#[async_trait]
pub trait ActionDispatch: Send + Sync + 'static {
    async fn dispatch(&self, request: &ActionRequest, cwd: &std::path::Path, timeout: Duration) -> ActionResult;
}

/// Dispatches to the concrete handlers in `crew_adapters::actions`, the
/// only [`ActionDispatch`] implementation used outside tests.
#[derive(Clone, Copy, Default)]
pub struct BuiltinDispatch;

#[async_trait]
impl ActionDispatch for BuiltinDispatch {
    async fn dispatch(&self, request: &ActionRequest, cwd: &std::path::Path, timeout: Duration) -> ActionResult {
        let params = &request.params;
        match request.action_name.as_str() {
            "git_status" => actions::git_status(cwd, timeout).await,
            "git_commit" => match get_str(params, "message") {
                Ok(message) => actions::git_commit(cwd, message, timeout).await,
                Err(e) => validation_result(e),
            },
            "git_push" => match (get_str(params, "remote"), get_str(params, "branch")) {
                (Ok(remote), Ok(branch)) => actions::git_push(cwd, remote, branch, timeout).await,
                (Err(e), _) | (_, Err(e)) => validation_result(e),
            },
            "run_tests" => match get_str(params, "runner") {
                Ok(runner) => actions::run_tests(cwd, runner, timeout).await,
                Err(e) => validation_result(e),
            },
            "lint_project" => match get_str(params, "linter") {
                Ok(linter) => actions::lint_project(cwd, linter, timeout).await,
                Err(e) => validation_result(e),
            },
            "build_project" => match get_str(params, "build_tool") {
                Ok(build_tool) => actions::build_project(cwd, build_tool, timeout).await,
                Err(e) => validation_result(e),
            },
            "install_dependencies" => match get_str(params, "manager") {
                Ok(manager) => actions::install_dependencies(cwd, manager, timeout).await,
                Err(e) => validation_result(e),
            },
            "start_dev_server" => match get_str(params, "runner") {
                Ok(runner) => actions::start_dev_server(cwd, runner).await,
                Err(e) => validation_result(e),
            },
            "file_write" => match (get_str(params, "path"), get_str(params, "content")) {
                (Ok(path), Ok(content)) => actions::file_write(std::path::Path::new(path), content).await,
                (Err(e), _) | (_, Err(e)) => validation_result(e),
            },
            "docker_build" => match get_str(params, "tag") {
                Ok(tag) => actions::docker_build(cwd, tag, timeout).await,
                Err(e) => validation_result(e),
            },
            "docker_compose_up" => actions::docker_compose_up(cwd, timeout).await,
            "run_coding_agent" => match (get_str(params, "agent_name"), get_str(params, "prompt")) {
                (Ok(agent_name), Ok(prompt)) => actions::run_coding_agent(cwd, agent_name, prompt, timeout).await,
                (Err(e), _) | (_, Err(e)) => validation_result(e),
            },
            "zip_project" => match (get_str(params, "project_dir"), get_str(params, "output_path")) {
                (Ok(project_dir), Ok(output_path)) => {
                    actions::zip_project(std::path::Path::new(project_dir), std::path::Path::new(output_path)).await
                }
                (Err(e), _) | (_, Err(e)) => validation_result(e),
            },
            other => ActionResult { returncode: -1, stdout: String::new(), stderr: format!("no handler for {other}") },
        }
    }
}

fn get_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, String> {
    params.get(key).and_then(|v| v.as_str()).ok_or_else(|| format!("missing or non-string param: {key}"))
}

fn validation_result(reason: String) -> ActionResult {
    ActionResult { returncode: -1, stdout: String::new(), stderr: reason }
}

/// Per-action timeout overrides (spec §4.2 step 8 / §5): dependency
/// installs get 300s, docker builds 600s, and coding-agent CLI
/// invocations 1800s; everything else falls back to the configured
/// default (120s in the default wiring).
fn timeout_for_action(action_name: &str, default: Duration) -> Duration {
    match action_name {
        "install_dependencies" => Duration::from_secs(300),
        "docker_build" | "docker_compose_up" => Duration::from_secs(600),
        "run_coding_agent" => Duration::from_secs(1800),
        _ => default,
    }
}

/// Size caps and format checks the validator enforces before dispatch
/// (spec §4.2 step 6), independent of the handler's own behavior: a
/// `file_write` whose `content` already exceeds 1 MiB, or a
/// `docker_build` whose `tag` fails the tag regex, is rejected here
/// rather than after a process has already been spawned.
fn validate_param_caps(action_name: &str, params: &serde_json::Value) -> Result<(), String> {
    match action_name {
        "file_write" => {
            if let Some(content) = params.get("content").and_then(|v| v.as_str()) {
                if content.len() > crew_adapters::actions::files::MAX_FILE_WRITE_BYTES {
                    return Err(format!(
                        "file_write content exceeds {} bytes",
                        crew_adapters::actions::files::MAX_FILE_WRITE_BYTES
                    ));
                }
            }
            Ok(())
        }
        "docker_build" => {
            if let Some(tag) = params.get("tag").and_then(|v| v.as_str()) {
                if !crew_adapters::actions::is_valid_docker_tag(tag) {
                    return Err(format!("invalid docker tag: {tag}"));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

pub struct Validator<C: OperatorConfirm, D: ActionDispatch = BuiltinDispatch> {
    control: Arc<ControlState>,
    registry: ActionRegistry,
    config: ValidatorConfig,
    confirm: C,
    audit: AuditLog,
    dispatch: D,
}

impl<C: OperatorConfirm, D: ActionDispatch> Validator<C, D> {
    pub fn new(control: Arc<ControlState>, registry: ActionRegistry, config: ValidatorConfig, confirm: C, audit: AuditLog, dispatch: D) -> Self {
        Self { control, registry, config, confirm, audit, dispatch }
    }

    pub async fn validate_and_execute(&self, request: &ActionRequest) -> Result<ActionResult, ActionError> {
        if self.control.is_stopped() {
            self.record(request, "emergency_stop", None).await;
            return Err(ActionError::EmergencyStop);
        }

        if !self.control.rate_limiter.check(Instant::now()) {
            self.record(request, "rate_limited", None).await;
            return Err(ActionError::RateLimited);
        }

        let Some(spec) = self.registry.lookup(&request.action_name) else {
            self.record(request, "unknown_action", None).await;
            return Err(ActionError::UnknownAction);
        };

        if spec.tier == Tier::Blocked {
            self.record(request, "blocked", None).await;
            return Err(ActionError::Blocked);
        }

        for path_param in spec.path_params {
            let Some(candidate) = request.params.get(*path_param).and_then(|v| v.as_str()) else {
                let reason = format!("missing path param: {path_param}");
                self.record(request, &format!("validation_failed: {reason}"), None).await;
                return Err(ActionError::ValidationFailed { reason });
            };
            if crew_adapters::resolve_within_jail(&self.config.project_dir, candidate, &self.config.allowed_roots).is_err() {
                self.record(request, "path_denied", None).await;
                return Err(ActionError::PathDenied);
            }
        }

        if let Err(reason) = validate_param_caps(&request.action_name, &request.params) {
            self.record(request, &format!("validation_failed: {reason}"), None).await;
            return Err(ActionError::ValidationFailed { reason });
        }

        // `working_dir` is optional: most spec examples pass it to scope an
        // action to a project checkout, but omitting it keeps the old
        // single-project-dir behavior. When present it still has to clear
        // the jail like any other path param.
        let cwd = match request.params.get("working_dir").and_then(|v| v.as_str()) {
            Some(candidate) => match crew_adapters::resolve_within_jail(&self.config.project_dir, candidate, &self.config.allowed_roots) {
                Ok(resolved) => resolved,
                Err(_) => {
                    self.record(request, "path_denied", None).await;
                    return Err(ActionError::PathDenied);
                }
            },
            None => self.config.project_dir.clone(),
        };

        if spec.tier == Tier::Confirm && !request.confirmed {
            let summary = format!("{} {}", request.action_name, request.params);
            if !self.confirm.confirm(&request.action_name, &summary).await {
                self.record(request, "confirmation_denied", None).await;
                return Err(ActionError::ConfirmationDenied);
            }
        }

        let started = Instant::now();
        let timeout = timeout_for_action(&request.action_name, self.config.default_timeout);
        let result = self.dispatch.dispatch(request, &cwd, timeout).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        self.record(request, "executed", Some((result.returncode, duration_ms))).await;
        Ok(result)
    }

    async fn record(&self, request: &ActionRequest, decision: &str, outcome: Option<(i32, u64)>) {
        let mut record = AuditRecord::new(&request.action_name, &request.params, decision, Utc::now());
        if let Some((returncode, duration_ms)) = outcome {
            record = record.with_outcome(returncode, duration_ms);
        }
        if let Err(e) = self.audit.append(&record).await {
            tracing::warn!(error = %e, action = %request.action_name, "failed to write audit record");
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
