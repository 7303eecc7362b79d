// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Gateway's HTTP surface. Served on two separate listeners, per
//! spec §4/§6: [`control_plane_router`] is the loopback-only control
//! plane plus the internal project-lifecycle API, and
//! [`channel_router`] is the single `/channel` WebSocket route the
//! Agent dials in on. Keeping them on separate ports means the
//! project-management surface never needs to be reachable from
//! wherever the Agent's network sits.

mod channel;
mod control;
mod projects;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn control_plane_router(state: AppState) -> Router {
    Router::new()
        .route("/action", post(control::post_action))
        .route("/emergency-stop", post(control::post_emergency_stop))
        .route("/resume", post(control::post_resume))
        .route("/status", get(control::get_status))
        .route("/projects", post(projects::create_project).get(projects::list_projects))
        .route("/projects/:id/ideas", post(projects::capture_idea))
        .route("/projects/:id/plan", post(projects::generate_plan))
        .route("/projects/:id/approve", post(projects::approve_plan))
        .route("/projects/:id/start", post(projects::start_project))
        .route("/projects/:id/cancel", post(projects::cancel_project))
        .route("/projects/:id/pause", post(projects::pause_project))
        .route("/projects/:id/resume", post(projects::resume_project))
        .route("/projects/:id/events", get(projects::list_events))
        .with_state(state)
}

pub fn channel_router(state: AppState) -> Router {
    Router::new().route("/channel", get(channel::upgrade)).with_state(state)
}
