// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! A single task execution attempt, watched for heartbeat staleness.

use crate::agent_record::AgentRecordId;
use crate::project::ProjectId;
use crate::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an agent run.
    pub struct AgentRunId("run-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRunStatus {
    Running,
    Succeeded,
    Failed,
}

crate::simple_display! {
    AgentRunStatus {
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

/// Free-form progress metadata attached to a run, surfaced by the
/// stall-watcher nudge and in `task_started`/`task_completed` events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRunMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub error: String,
}

/// A single task execution attempt by an agent.
///
/// Heartbeats are touched periodically while the run is active; the stall
/// watcher compares `heartbeat_at` against the current time to detect a
/// wedged worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    pub id: AgentRunId,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub agent_id: AgentRecordId,
    pub agent_role: String,
    pub status: AgentRunStatus,
    pub started_at: DateTime<Utc>,
    pub heartbeat_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub metadata: AgentRunMetadata,
}

impl AgentRun {
    pub fn start(
        project_id: ProjectId,
        task_id: Option<TaskId>,
        agent_id: AgentRecordId,
        agent_role: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AgentRunId::new(),
            project_id,
            task_id,
            agent_id,
            agent_role: agent_role.into(),
            status: AgentRunStatus::Running,
            started_at: now,
            heartbeat_at: now,
            finished_at: None,
            error_message: String::new(),
            metadata: AgentRunMetadata::default(),
        }
    }

    pub fn heartbeat(&mut self, now: DateTime<Utc>) {
        self.heartbeat_at = now;
    }

    /// Returns true if no heartbeat has landed within `stall_after`.
    pub fn is_stalled(&self, now: DateTime<Utc>, stall_after: chrono::Duration) -> bool {
        self.status == AgentRunStatus::Running && now - self.heartbeat_at >= stall_after
    }

    pub fn finish(&mut self, status: AgentRunStatus, now: DateTime<Utc>) {
        debug_assert_ne!(status, AgentRunStatus::Running, "finish() requires a terminal status");
        self.status = status;
        self.finished_at = Some(now);
        self.heartbeat_at = now;
    }
}

crate::builder! {
    pub struct AgentRunBuilder => AgentRun {
        set {
            project_id: ProjectId = ProjectId::new(),
            agent_id: AgentRecordId = AgentRecordId::new(),
            status: AgentRunStatus = AgentRunStatus::Running,
        }
        into {
            agent_role: String = "backend",
            error_message: String = "",
        }
        option {
            task_id: TaskId = None,
            finished_at: DateTime<Utc> = None,
        }
        computed {
            id: AgentRunId = AgentRunId::new(),
            started_at: DateTime<Utc> = Utc::now(),
            heartbeat_at: DateTime<Utc> = Utc::now(),
            metadata: AgentRunMetadata = AgentRunMetadata::default(),
        }
    }
}

#[cfg(test)]
#[path = "agent_run_tests.rs"]
mod tests;
