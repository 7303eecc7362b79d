// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Specialized agent records, one per (project, role) pair.

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an agent record.
    pub struct AgentRecordId("agr-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRecordStatus {
    Idle,
    Running,
}

crate::simple_display! {
    AgentRecordStatus {
        Idle => "idle",
        Running => "running",
    }
}

/// A specialized agent tracked against a project + role pair.
///
/// The `(project_id, role)` pair is unique: the Worker looks one up (or
/// creates it) rather than spawning a fresh record per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentRecordId,
    pub project_id: ProjectId,
    pub role: String,
    pub status: AgentRecordStatus,
    pub tasks_completed: u32,
    pub total_tokens: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
}

impl AgentRecord {
    pub fn new(project_id: ProjectId, role: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: AgentRecordId::new(),
            project_id,
            role: role.into(),
            status: AgentRecordStatus::Idle,
            tasks_completed: 0,
            total_tokens: 0,
            created_at: now,
            last_active_at: None,
        }
    }

    /// Marks the record as running and touches `last_active_at`.
    pub fn mark_running(&mut self, now: DateTime<Utc>) {
        self.status = AgentRecordStatus::Running;
        self.last_active_at = Some(now);
    }

    /// Marks the record idle, recording a completed task and its token usage.
    pub fn mark_idle_after_task(&mut self, tokens_used: u64, now: DateTime<Utc>) {
        self.status = AgentRecordStatus::Idle;
        self.tasks_completed += 1;
        self.total_tokens += tokens_used;
        self.last_active_at = Some(now);
    }
}

crate::builder! {
    pub struct AgentRecordBuilder => AgentRecord {
        set {
            project_id: ProjectId = ProjectId::new(),
            status: AgentRecordStatus = AgentRecordStatus::Idle,
            tasks_completed: u32 = 0,
            total_tokens: u64 = 0,
        }
        into {
            role: String = "backend",
        }
        option {
            last_active_at: DateTime<Utc> = None,
        }
        computed {
            id: AgentRecordId = AgentRecordId::new(),
            created_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "agent_record_tests.rs"]
mod tests;
