// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The internal project-lifecycle API: create/list projects, capture
//! ideas, synthesize and approve a plan, start/cancel/pause/resume
//! execution, and read back the event log. This is a supplement to the
//! spec's literal loopback surface — it is the thinnest possible HTTP
//! skin over `crew_engine::project`'s already-implemented free
//! functions and the `Worker`.

use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use crew_core::{Project, ProjectId};
use crew_engine::project::{self, OrchestratorError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub local_path: String,
}

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<crew_core::ProjectEvent>,
}

fn orchestrator_error_response(err: OrchestratorError) -> Response {
    let status = match &err {
        OrchestratorError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
        OrchestratorError::InvalidTransition { .. } => StatusCode::CONFLICT,
        OrchestratorError::NoActivePlan(_) => StatusCode::CONFLICT,
        OrchestratorError::Storage(_) | OrchestratorError::ToolLoop(_) | OrchestratorError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

fn not_found(project_id: ProjectId) -> Response {
    orchestrator_error_response(OrchestratorError::ProjectNotFound(project_id))
}

fn load_project(state: &AppState, id: ProjectId) -> Result<Project, Response> {
    match state.store.get_project(&id) {
        Ok(Some(project)) => Ok(project),
        Ok(None) => Err(not_found(id)),
        Err(e) => Err(orchestrator_error_response(OrchestratorError::Storage(e))),
    }
}

pub async fn create_project(State(state): State<AppState>, Json(body): Json<CreateProjectRequest>) -> Response {
    let mut project = Project::new(ProjectId::new(), body.name, body.display_name, Utc::now());
    project.description = body.description;
    if !body.local_path.is_empty() {
        project.local_path = body.local_path.into();
    }
    match state.store.insert_project(&project) {
        Ok(()) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => orchestrator_error_response(OrchestratorError::Storage(e)),
    }
}

pub async fn list_projects(State(state): State<AppState>) -> Response {
    match state.store.list_projects() {
        Ok(projects) => Json(projects).into_response(),
        Err(e) => orchestrator_error_response(OrchestratorError::Storage(e)),
    }
}

pub async fn capture_idea(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<IdeaRequest>) -> Response {
    let project_id = ProjectId::from_string(&id);
    match project::capture_idea(&state.store, project_id, body.message, Utc::now()) {
        Ok(idea) => Json(idea).into_response(),
        Err(e) => orchestrator_error_response(e),
    }
}

pub async fn generate_plan(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    let mut project = match load_project(&state, project_id) {
        Ok(project) => project,
        Err(response) => return response,
    };
    match project::generate_plan(&state.store, &state.router, &mut project).await {
        Ok(Some(plan)) => Json(plan).into_response(),
        Ok(None) => (StatusCode::UNPROCESSABLE_ENTITY, Json(serde_json::json!({"error": "plan_synthesis_failed"}))).into_response(),
        Err(e) => orchestrator_error_response(e),
    }
}

pub async fn approve_plan(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    let mut project = match load_project(&state, project_id) {
        Ok(project) => project,
        Err(response) => return response,
    };
    match project::approve_plan(&state.store, &mut project, Utc::now()) {
        Ok(()) => Json(project).into_response(),
        Err(e) => orchestrator_error_response(e),
    }
}

/// `approved -> coding`, then hands the project to the `Worker` in a
/// background task. Starting the same project twice while it is already
/// running is rejected rather than racing two workers over one plan.
pub async fn start_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    let mut project = match load_project(&state, project_id) {
        Ok(project) => project,
        Err(response) => return response,
    };

    let mut running = state.running_projects.lock().await;
    if running.get(&project_id).is_some_and(|h| !h.is_finished()) {
        return (StatusCode::CONFLICT, Json(serde_json::json!({"error": "project already running"}))).into_response();
    }

    if let Err(e) = project::start_execution(&state.store, &mut project, Utc::now()) {
        return orchestrator_error_response(e);
    }

    let worker = state.worker.clone();
    let handle = tokio::spawn(async move {
        if let Err(err) = worker.run_project(project_id).await {
            tracing::error!(%project_id, error = %err, "worker run_project failed");
        }
    });
    running.insert(project_id, handle);
    drop(running);

    Json(project).into_response()
}

pub async fn cancel_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    state.pause_gates.gate_for(project_id.as_str()).cancel();
    StatusCode::NO_CONTENT.into_response()
}

pub async fn pause_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    state.pause_gates.gate_for(project_id.as_str()).pause();
    StatusCode::NO_CONTENT.into_response()
}

pub async fn resume_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    state.pause_gates.gate_for(project_id.as_str()).resume();
    StatusCode::NO_CONTENT.into_response()
}

pub async fn list_events(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let project_id = ProjectId::from_string(&id);
    match state.store.list_events_for_project(&project_id) {
        Ok(events) => Json(EventsResponse { events }).into_response(),
        Err(e) => orchestrator_error_response(OrchestratorError::Storage(e)),
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
