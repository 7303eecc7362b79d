// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Generated documents/files recorded against a task, surfaced during
//! the final-validation phase ("record any generated artifacts").

use crate::project::ProjectId;
use crate::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a task artifact.
    pub struct TaskArtifactId("art-");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskArtifactId>,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub artifact_type: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TaskArtifact {
    pub fn new(
        project_id: ProjectId,
        task_id: Option<TaskId>,
        artifact_type: impl Into<String>,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            project_id,
            task_id,
            artifact_type: artifact_type.into(),
            title: title.into(),
            content: String::new(),
            file_path: String::new(),
            url: String::new(),
            metadata: serde_json::Value::Null,
            created_at: now,
        }
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
