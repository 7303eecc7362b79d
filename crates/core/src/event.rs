// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! High-level project events, persisted and fanned out to the chat
//! front-end. Every event for a project is emitted in occurrence order
//! and stored with a monotonic timestamp.

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of lifecycle event being reported.
///
/// Variants carry just enough structure for the front-end to render a
/// sensible line; the free-text `summary`/`detail` on [`ProjectEvent`]
/// carry the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ProjectEventKind {
    Started,
    MilestoneStarted { index: u32, total: u32 },
    MilestoneReview { milestone_done: u32, milestone_total: u32, overall_done: u32, overall_total: u32 },
    TaskStarted,
    TaskCompleted,
    Testing,
    Completed,
    Failed,
    Cancelled,
    Paused,
    Resumed,
    PlanSynthesisFailed,
    /// Emitted exactly once per run by the stall watcher.
    ManagerNudge,
}

impl ProjectEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectEventKind::Started => "started",
            ProjectEventKind::MilestoneStarted { .. } => "milestone_started",
            ProjectEventKind::MilestoneReview { .. } => "milestone_review",
            ProjectEventKind::TaskStarted => "task_started",
            ProjectEventKind::TaskCompleted => "task_completed",
            ProjectEventKind::Testing => "testing",
            ProjectEventKind::Completed => "completed",
            ProjectEventKind::Failed => "failed",
            ProjectEventKind::Cancelled => "cancelled",
            ProjectEventKind::Paused => "paused",
            ProjectEventKind::Resumed => "resumed",
            ProjectEventKind::PlanSynthesisFailed => "plan_synthesis_failed",
            ProjectEventKind::ManagerNudge => "manager_nudge",
        }
    }
}

/// A persisted, fanned-out project event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub kind: ProjectEventKind,
    pub summary: String,
    #[serde(default)]
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

impl ProjectEvent {
    pub fn new(project_id: ProjectId, kind: ProjectEventKind, summary: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { id: None, project_id, kind, summary: summary.into(), detail: String::new(), created_at: now }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
