// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Individual tasks within a plan. Ordering within a plan defines
//! execution order; a task's status may only move along the allowed
//! edges of the state machine below.

use crate::plan::PlanId;
use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a task.
    pub struct TaskId("tsk-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

crate::simple_display! {
    TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
        Skipped => "skipped",
    }
}

impl TaskStatus {
    /// True for the three terminal outcomes a task can settle into.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped)
    }

    /// Whether moving from `self` to `next` is an allowed transition.
    ///
    /// `pending -> in_progress -> {completed, failed, skipped}`. No other
    /// edge is permitted, including moving backwards or skipping straight
    /// from `pending` to a terminal state.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Failed)
                | (TaskStatus::InProgress, TaskStatus::Skipped)
        )
    }
}

/// A single task belonging to a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub project_id: ProjectId,
    pub plan_id: PlanId,
    /// Grouping milestone name; empty is normalized to `"General"` by the caller.
    pub milestone: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub order_index: u32,
    pub assigned_agent_role: String,
    #[serde(default)]
    pub result_summary: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Attempts the transition, mutating `started_at`/`completed_at` as the
    /// edge requires. Returns `false` (no mutation) if the edge is illegal.
    pub fn transition(&mut self, next: TaskStatus, now: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        if next == TaskStatus::InProgress {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.completed_at = Some(now);
        }
        self.status = next;
        true
    }
}

crate::builder! {
    pub struct TaskBuilder => Task {
        set {
            project_id: ProjectId = ProjectId::new(),
            plan_id: PlanId = PlanId::new(),
            status: TaskStatus = TaskStatus::Pending,
            order_index: u32 = 0,
        }
        into {
            milestone: String = "Scaffold",
            title: String = "init repo",
            description: String = "",
            assigned_agent_role: String = "backend",
            result_summary: String = "",
            error_message: String = "",
        }
        option {
            id: TaskId = None,
            started_at: DateTime<Utc> = None,
            completed_at: DateTime<Utc> = None,
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
