// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Project Orchestrator (spec §4.5/§4.6/§4.7): the ideation →
//! planning → approved → coding → testing → completed/failed/cancelled
//! lifecycle, plan synthesis from captured ideas, task-type
//! classification for routing, and the Worker main loop that drives the
//! tool loop task by task with a stall watcher and progress fan-out.
//!
//! There is a single [`Worker`] type, not one orchestrator per agent
//! role: role specialization is expressed through the pluggable
//! [`AgentBuilder`] hook a caller supplies at construction, defaulting to
//! each task's own `assigned_agent_role`.

use crate::provider::{ChatRequest, Message, ProviderError, ProviderRouter, TaskType};
use crate::tool_loop::{TaskContext, ToolLoop, ToolLoopError};
use crate::control::PauseGateRegistry;
use chrono::{DateTime, Utc};
use crew_adapters::{ChatAdapter, FallbackExecutor};
use crew_core::{
    AgentRecord, AgentRecordStatus, AgentRun, AgentRunStatus, Idea, Milestone, Plan, Project, ProjectEvent,
    ProjectEventKind, ProjectId, ProjectStatus, Task, TaskArtifact, TaskStatus,
};
use crew_storage::{Store, StorageError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use thiserror::Error;

/// How often the stall watcher heartbeats a running agent run (spec
/// §4.5, "Watcher").
pub const WATCHER_HEARTBEAT_INTERVAL: StdDuration = StdDuration::from_secs(20);

/// Elapsed time since a run started without a heartbeat-driven
/// completion before the watcher nudges once (spec §4.5).
fn stall_threshold() -> chrono::Duration {
    chrono::Duration::seconds(120)
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("tool loop error: {0}")]
    ToolLoop(#[from] ToolLoopError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("project {0} has no active plan")]
    NoActivePlan(ProjectId),
    #[error("project {project_id} must be in status '{expected}' for this transition")]
    InvalidTransition { project_id: ProjectId, expected: &'static str },
}

/// Computes a task-type tag from keyword heuristics over the milestone,
/// title, and description (spec §4.7), so the Router biases cheap
/// providers toward boilerplate and stronger ones toward debugging and
/// refactoring.
pub fn classify_task_type(milestone: &str, title: &str, description: &str) -> TaskType {
    let haystack = format!("{milestone} {title} {description}").to_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|n| haystack.contains(n));

    if any(&["debug", "fix bug", "root cause", "crash", "stack trace", "flaky"]) {
        TaskType::HardDebug
    } else if any(&["refactor", "restructure", "redesign", "extract module", "rearchitect"]) {
        TaskType::ComplexRefactor
    } else if any(&["plan", "milestone breakdown", "roadmap"]) {
        TaskType::Planning
    } else if any(&["scaffold", "bootstrap", "init repo", "project skeleton", "initial setup"]) {
        TaskType::Scaffold
    } else if any(&["unit test", "test case", "write tests", "pytest", "cargo test", "assert"]) {
        TaskType::UnitTest
    } else if any(&["readme", "documentation polish", "docs pass", "polish docs"]) {
        TaskType::ReadmePolish
    } else if any(&["crud", "endpoint", "model field", "migration", "api route", "schema"]) {
        TaskType::Crud
    } else {
        TaskType::General
    }
}

/// The parsed shape of a plan-synthesis response (spec §4.6): a summary
/// and an ordered list of milestones, each carrying its tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSynthesis {
    pub summary: String,
    pub milestones: Vec<MilestoneSynthesis>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneSynthesis {
    pub name: String,
    pub tasks: Vec<TaskSynthesis>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskSynthesis {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub milestone: String,
    #[serde(default)]
    pub assigned_agent_role: Option<String>,
}

/// Parses a plan-synthesis response, trying the whole text as JSON, then
/// a fenced code block, then the first balanced `{...}` substring (spec
/// §4.6, "Parse strategy").
pub fn parse_plan_response(text: &str) -> Result<PlanSynthesis, serde_json::Error> {
    if let Ok(plan) = serde_json::from_str::<PlanSynthesis>(text.trim()) {
        return Ok(plan);
    }
    if let Some(fenced) = extract_fenced_block(text) {
        if let Ok(plan) = serde_json::from_str::<PlanSynthesis>(&fenced) {
            return Ok(plan);
        }
    }
    match extract_first_object(text) {
        Some(object) => serde_json::from_str(&object),
        None => serde_json::from_str(text),
    }
}

fn extract_fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after_marker = &text[start + 3..];
    let after_marker = after_marker.strip_prefix("json").unwrap_or(after_marker);
    let end = after_marker.find("```")?;
    Some(after_marker[..end].trim().to_string())
}

fn extract_first_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0i32;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Records one ideation-phase message verbatim (spec §4.6, "Ideas
/// captured during ideation are accumulated verbatim").
pub fn capture_idea(store: &Store, project_id: ProjectId, message_text: impl Into<String>, now: DateTime<Utc>) -> Result<Idea, OrchestratorError> {
    let idea = Idea::new(project_id, message_text, now);
    Ok(store.insert_idea(&idea)?)
}

/// Whether a minimum-idea threshold plus the `AUTO_APPROVE_AND_START`
/// flag should elide the operator approval step (spec §4.6, "Auto-approval mode").
pub fn maybe_auto_approve(ideas_captured: usize, auto_approve_and_start: bool, min_idea_threshold: usize) -> bool {
    auto_approve_and_start && ideas_captured >= min_idea_threshold
}

/// Builds a structured planning prompt, calls the Router with
/// `TaskType::Planning`, parses the response, and persists the result
/// (spec §4.6). On parse failure the project stays in `planning` and a
/// `plan_synthesis_failed` event is recorded; on success a new plan
/// version is persisted, the prior active plan is deactivated, and its
/// tasks are inserted in declared order.
pub async fn generate_plan(store: &Store, router: &ProviderRouter, project: &mut Project) -> Result<Option<Plan>, OrchestratorError> {
    let now = Utc::now();
    if project.status == ProjectStatus::Ideation {
        project.status = ProjectStatus::Planning;
        project.updated_at = now;
        store.update_project(project)?;
    }

    let ideas = store.list_ideas_for_project(&project.id)?;
    let request = ChatRequest {
        messages: vec![Message::user(build_plan_prompt(project, &ideas))],
        tools: Vec::new(),
        system: None,
        max_tokens: None,
        task_type: TaskType::Planning,
        preferred_provider: None,
        allowed_providers: None,
    };
    let response = router.chat(request).await?;

    let synthesis = match parse_plan_response(&response.text) {
        Ok(synthesis) => synthesis,
        Err(_) => {
            let event = ProjectEvent::new(project.id, ProjectEventKind::PlanSynthesisFailed, "could not parse plan synthesis response", now)
                .with_detail(response.text);
            store.insert_event(&event)?;
            return Ok(None);
        }
    };

    let prior = store.get_active_plan(&project.id)?;
    let milestones: Vec<Milestone> = synthesis.milestones.iter().map(|m| Milestone::new(m.name.clone())).collect();
    let plan = match &prior {
        Some(prior) => Plan::supersede(prior, synthesis.summary.clone(), milestones, now),
        None => Plan::first(project.id, synthesis.summary.clone(), milestones, now),
    };
    let plan = store.insert_plan(&plan)?;
    let plan_id = plan.id.ok_or(OrchestratorError::NoActivePlan(project.id))?;

    let mut order_index = 0u32;
    for milestone in &synthesis.milestones {
        for task_synthesis in &milestone.tasks {
            let milestone_name =
                if task_synthesis.milestone.trim().is_empty() { milestone.name.clone() } else { task_synthesis.milestone.clone() };
            let role = task_synthesis.assigned_agent_role.clone().unwrap_or_else(|| "backend".to_string());
            let task = Task {
                id: None,
                project_id: project.id,
                plan_id,
                milestone: milestone_name,
                title: task_synthesis.title.clone(),
                description: task_synthesis.description.clone(),
                status: TaskStatus::Pending,
                order_index,
                assigned_agent_role: role,
                result_summary: String::new(),
                error_message: String::new(),
                started_at: None,
                completed_at: None,
                created_at: now,
            };
            store.insert_task(&task)?;
            order_index += 1;
        }
    }

    Ok(Some(plan))
}

fn build_plan_prompt(project: &Project, ideas: &[Idea]) -> String {
    let mut prompt = format!(
        "Project: {}\nDescription: {}\n\nCaptured ideas:\n",
        project.display_name, project.description
    );
    for idea in ideas {
        prompt.push_str("- ");
        prompt.push_str(&idea.message_text);
        prompt.push('\n');
    }
    prompt.push_str(
        "\nRespond with a JSON object of the shape \
         {\"summary\": string, \"milestones\": [{\"name\": string, \"tasks\": [{\"title\": string, \
         \"description\": string, \"milestone\": string, \"assigned_agent_role\": string}]}]}.",
    );
    prompt
}

/// `planning → approved` (spec §4.6): requires an operator's explicit
/// `approve_plan` call, unless elided by [`maybe_auto_approve`].
pub fn approve_plan(store: &Store, project: &mut Project, now: DateTime<Utc>) -> Result<(), OrchestratorError> {
    if project.status != ProjectStatus::Planning {
        return Err(OrchestratorError::InvalidTransition { project_id: project.id, expected: "planning" });
    }
    project.status = ProjectStatus::Approved;
    project.approved_at = Some(now);
    project.updated_at = now;
    store.update_project(project)?;
    Ok(())
}

/// `approved → coding` (spec §4.5): the entry point a driver (the
/// gateway's HTTP layer) calls before handing the project to a
/// [`Worker`]. The Worker's own main loop performs the same transition
/// idempotently as its first step, so this is safe to skip if the
/// caller goes straight to [`Worker::run_project`].
pub fn start_execution(store: &Store, project: &mut Project, now: DateTime<Utc>) -> Result<(), OrchestratorError> {
    if project.status != ProjectStatus::Approved {
        return Err(OrchestratorError::InvalidTransition { project_id: project.id, expected: "approved" });
    }
    project.status = ProjectStatus::Coding;
    project.updated_at = now;
    store.update_project(project)?;
    Ok(())
}

/// Construction hook for a task's executing role (spec §9's resolved
/// open question: one `Worker`, a pluggable builder instead of a second
/// orchestrator type). Defaults to the task's own `assigned_agent_role`.
pub type AgentBuilder = Arc<dyn Fn(&Task) -> String + Send + Sync>;

fn default_agent_builder() -> AgentBuilder {
    Arc::new(|task: &Task| task.assigned_agent_role.clone())
}

/// Drives a single project's tasks through the tool loop, emitting
/// lifecycle events, fanning them out to the chat front-end, and
/// watching for a stalled run (spec §4.5).
pub struct Worker<F: FallbackExecutor> {
    store: Arc<Store>,
    tool_loop: Arc<ToolLoop<F>>,
    chat: Arc<dyn ChatAdapter>,
    pause_gates: Arc<PauseGateRegistry>,
    agent_builder: AgentBuilder,
}

impl<F: FallbackExecutor> Worker<F> {
    pub fn new(store: Arc<Store>, tool_loop: Arc<ToolLoop<F>>, chat: Arc<dyn ChatAdapter>, pause_gates: Arc<PauseGateRegistry>) -> Self {
        Self { store, tool_loop, chat, pause_gates, agent_builder: default_agent_builder() }
    }

    pub fn with_agent_builder(mut self, builder: AgentBuilder) -> Self {
        self.agent_builder = builder;
        self
    }

    /// Runs the project's active plan to completion (or cancellation),
    /// per the Worker main loop in spec §4.5.
    pub async fn run_project(&self, project_id: ProjectId) -> Result<(), OrchestratorError> {
        let mut project = self.store.get_project(&project_id)?.ok_or(OrchestratorError::ProjectNotFound(project_id))?;
        let plan = self.store.get_active_plan(&project_id)?.ok_or(OrchestratorError::NoActivePlan(project_id))?;
        let plan_id = plan.id.ok_or(OrchestratorError::NoActivePlan(project_id))?;
        let mut tasks = self.store.list_tasks_for_plan(&plan_id)?;
        tasks.sort_by_key(|t| t.order_index);

        let gate = self.pause_gates.gate_for(project_id.as_str());
        let overall_total = tasks.len() as u32;
        let milestone_total = distinct_milestone_count(&tasks);

        self.transition_project(&mut project, ProjectStatus::Coding, Utc::now())?;
        self.emit(project_id, ProjectEventKind::Started, "worker started").await?;

        let mut current_milestone: Option<String> = None;
        let mut milestone_index = 0u32;
        let mut overall_done = 0u32;

        for task in &mut tasks {
            if gate.is_cancelled() {
                self.emit(project_id, ProjectEventKind::Cancelled, "project cancelled").await?;
                self.transition_project(&mut project, ProjectStatus::Cancelled, Utc::now())?;
                return Ok(());
            }
            if gate.is_paused() {
                self.emit(project_id, ProjectEventKind::Paused, "worker paused").await?;
                gate.wait_if_paused().await;
                if gate.is_cancelled() {
                    self.emit(project_id, ProjectEventKind::Cancelled, "project cancelled").await?;
                    self.transition_project(&mut project, ProjectStatus::Cancelled, Utc::now())?;
                    return Ok(());
                }
                self.emit(project_id, ProjectEventKind::Resumed, "worker resumed").await?;
            }

            if current_milestone.as_deref() != Some(task.milestone.as_str()) {
                if let Some(prior) = &current_milestone {
                    let milestone_done = tasks.iter().filter(|t| &t.milestone == prior && t.status.is_terminal()).count() as u32;
                    let milestone_total_tasks = tasks.iter().filter(|t| &t.milestone == prior).count() as u32;
                    let event = ProjectEvent::new(
                        project_id,
                        ProjectEventKind::MilestoneReview { milestone_done, milestone_total: milestone_total_tasks, overall_done, overall_total },
                        format!("milestone '{prior}' review"),
                        Utc::now(),
                    );
                    self.record(event).await?;
                }
                milestone_index += 1;
                current_milestone = Some(task.milestone.clone());
                let event = ProjectEvent::new(
                    project_id,
                    ProjectEventKind::MilestoneStarted { index: milestone_index, total: milestone_total },
                    format!("milestone '{}' started", task.milestone),
                    Utc::now(),
                );
                self.record(event).await?;
            }

            task.transition(TaskStatus::InProgress, Utc::now());
            self.store.update_task(task)?;
            self.emit(project_id, ProjectEventKind::TaskStarted, task.title.clone()).await?;

            let role = (self.agent_builder)(task);
            let mut agent_record = self
                .store
                .get_agent_record(&project_id, &role)?
                .unwrap_or_else(|| AgentRecord::new(project_id, role.clone(), Utc::now()));
            agent_record.mark_running(Utc::now());
            self.store.upsert_agent_record(&agent_record)?;

            let run = AgentRun::start(project_id, task.id, agent_record.id, role.clone(), Utc::now());
            self.store.insert_agent_run(&run)?;
            let watcher = spawn_stall_watcher(Arc::clone(&self.store), Arc::clone(&self.chat), project_id, run.clone());

            let task_type = classify_task_type(&task.milestone, &task.title, &task.description);
            let task_id_str = task.id.map(|id| id.to_string()).unwrap_or_default();
            let outcome = self
                .tool_loop
                .run_task(TaskContext {
                    project_id,
                    task_id: &task_id_str,
                    role: &role,
                    task_type,
                    task_description: &task.description,
                    plan_scope_approved: true,
                })
                .await;
            watcher.abort();

            let mut run = run;
            match outcome {
                Ok(outcome) => {
                    task.result_summary = outcome.text;
                    task.transition(TaskStatus::Completed, Utc::now());
                    run.finish(AgentRunStatus::Succeeded, Utc::now());
                    agent_record.mark_idle_after_task(0, Utc::now());
                }
                Err(err) => {
                    task.error_message = err.to_string();
                    task.transition(TaskStatus::Failed, Utc::now());
                    run.error_message = err.to_string();
                    run.finish(AgentRunStatus::Failed, Utc::now());
                    agent_record.mark_idle_after_task(0, Utc::now());
                }
            }
            self.store.update_task(task)?;
            self.store.update_agent_run(&run)?;
            agent_record.status = AgentRecordStatus::Idle;
            self.store.upsert_agent_record(&agent_record)?;
            overall_done += 1;
            self.emit(project_id, ProjectEventKind::TaskCompleted, task.title.clone()).await?;
        }

        self.transition_project(&mut project, ProjectStatus::Testing, Utc::now())?;
        self.emit(project_id, ProjectEventKind::Testing, "running final validation").await?;

        let validation = self
            .tool_loop
            .run_task(TaskContext {
                project_id,
                task_id: "final-validation",
                role: "backend",
                task_type: TaskType::UnitTest,
                task_description: "Run the full test suite, lint the project, and perform a smoke check. Report any failures.",
                plan_scope_approved: true,
            })
            .await?;

        let artifact = TaskArtifact::new(project_id, None, "final_validation_report", "Final validation", Utc::now());
        let mut artifact = artifact;
        artifact.content = validation.text;
        self.store.insert_artifact(&artifact)?;

        self.transition_project(&mut project, ProjectStatus::Completed, Utc::now())?;
        self.emit(project_id, ProjectEventKind::Completed, "project completed").await?;

        let summary_event = ProjectEvent::new(
            project_id,
            ProjectEventKind::MilestoneReview {
                milestone_done: overall_total,
                milestone_total: overall_total,
                overall_done: overall_total,
                overall_total,
            },
            "final summary",
            Utc::now(),
        );
        self.record(summary_event).await?;

        Ok(())
    }

    fn transition_project(&self, project: &mut Project, next: ProjectStatus, now: DateTime<Utc>) -> Result<(), OrchestratorError> {
        project.status = next;
        project.updated_at = now;
        if next == ProjectStatus::Completed {
            project.completed_at = Some(now);
        }
        self.store.update_project(project)?;
        Ok(())
    }

    async fn emit(&self, project_id: ProjectId, kind: ProjectEventKind, summary: impl Into<String>) -> Result<(), OrchestratorError> {
        let event = ProjectEvent::new(project_id, kind, summary, Utc::now());
        self.record(event).await
    }

    /// Persists an event and fans it out to the chat front-end. A
    /// fan-out failure is logged, never propagated (spec §4.5,
    /// "Progress notification fan-out").
    async fn record(&self, event: ProjectEvent) -> Result<(), OrchestratorError> {
        let stored = self.store.insert_event(&event)?;
        if let Err(err) = self.chat.on_progress(stored.project_id, stored.kind.as_str(), &stored.summary).await {
            tracing::warn!(project_id = %stored.project_id, error = %err, "chat front-end failed to deliver progress event");
        }
        Ok(())
    }
}

fn distinct_milestone_count(tasks: &[Task]) -> u32 {
    let mut seen = std::collections::HashSet::new();
    tasks.iter().filter(|t| seen.insert(t.milestone.clone())).count() as u32
}

/// A lightweight per-run task that heartbeats every
/// [`WATCHER_HEARTBEAT_INTERVAL`] and emits `manager_nudge` exactly once
/// if the run has been open for more than the stall threshold. It never
/// cancels the task itself; the caller aborts this handle once the run
/// finishes (spec §4.5, "Watcher").
fn spawn_stall_watcher(
    store: Arc<Store>,
    chat: Arc<dyn ChatAdapter>,
    project_id: ProjectId,
    mut run: AgentRun,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut nudged = false;
        loop {
            tokio::time::sleep(WATCHER_HEARTBEAT_INTERVAL).await;
            let now = Utc::now();
            run.heartbeat(now);
            if let Err(err) = store.update_agent_run(&run) {
                tracing::warn!(project_id = %project_id, error = %err, "stall watcher failed to persist heartbeat");
            }
            if !nudged && now - run.started_at >= stall_threshold() {
                nudged = true;
                let event = ProjectEvent::new(
                    project_id,
                    ProjectEventKind::ManagerNudge,
                    format!("agent run {} has not completed after {}s", run.id, stall_threshold().num_seconds()),
                    now,
                );
                match store.insert_event(&event) {
                    Ok(stored) => {
                        if let Err(err) = chat.on_progress(project_id, stored.kind.as_str(), &stored.summary).await {
                            tracing::warn!(project_id = %project_id, error = %err, "chat front-end failed to deliver manager_nudge");
                        }
                    }
                    Err(err) => tracing::warn!(project_id = %project_id, error = %err, "failed to persist manager_nudge event"),
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
