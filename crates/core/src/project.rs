// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Project identifier and lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a project.
    pub struct ProjectId("prj-");
}

/// Lifecycle status of a project.
///
/// Transitions are driven by the Project Manager and the Worker; see
/// `crew-engine`'s `project` module for the state machine itself. This
/// type only carries the tag — it has no transition logic of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Ideation,
    Planning,
    Approved,
    Coding,
    Testing,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    ProjectStatus {
        Ideation => "ideation",
        Planning => "planning",
        Approved => "approved",
        Coding => "coding",
        Testing => "testing",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl ProjectStatus {
    /// Whether a project in this status must have an active plan.
    pub fn requires_active_plan(&self) -> bool {
        matches!(self, ProjectStatus::Coding | ProjectStatus::Testing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Completed | ProjectStatus::Failed | ProjectStatus::Cancelled
        )
    }
}

/// A project tracked by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Short, URL/command-safe unique name (e.g. `alpha`).
    pub name: String,
    /// Human-facing display name.
    pub display_name: String,
    pub description: String,
    pub status: ProjectStatus,
    /// Local workspace path the Agent operates within.
    pub local_path: PathBuf,
    /// Remote repository URL, once one has been created/linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set iff the project has ever been approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Set iff the project is currently completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Set once the final-validation/bootstrap phase has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_result: Option<bool>,
    #[serde(default)]
    pub bootstrap_summary: String,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            status: ProjectStatus::Ideation,
            local_path: PathBuf::new(),
            remote_repo_url: None,
            created_at: now,
            updated_at: now,
            approved_at: None,
            completed_at: None,
            bootstrap_result: None,
            bootstrap_summary: String::new(),
        }
    }

    /// Invariant check: `approved_at` is set iff the project has ever been approved.
    pub fn approval_invariant_holds(&self) -> bool {
        let ever_approved = !matches!(self.status, ProjectStatus::Ideation | ProjectStatus::Planning);
        ever_approved == self.approved_at.is_some()
    }

    /// Invariant check: `completed_at` is set iff status is completed.
    pub fn completion_invariant_holds(&self) -> bool {
        (self.status == ProjectStatus::Completed) == self.completed_at.is_some()
    }
}

crate::builder! {
    pub struct ProjectBuilder => Project {
        into {
            name: String = "alpha",
            display_name: String = "Alpha",
            description: String = "",
            local_path: PathBuf = "/tmp/alpha",
            bootstrap_summary: String = "",
        }
        set {
            status: ProjectStatus = ProjectStatus::Ideation,
            id: ProjectId = ProjectId::new(),
        }
        option {
            remote_repo_url: String = None,
            approved_at: DateTime<Utc> = None,
            completed_at: DateTime<Utc> = None,
            bootstrap_result: bool = None,
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
            updated_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
