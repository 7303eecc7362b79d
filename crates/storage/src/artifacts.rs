// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for generated task artifacts.

use crate::error::StorageResult;
use crate::store::Store;
use crew_core::{ProjectId, TaskArtifact, TaskArtifactId, TaskId};
use rusqlite::{params, Row};

fn row_to_artifact(row: &Row<'_>) -> rusqlite::Result<TaskArtifact> {
    let metadata_json: String = row.get("metadata_json")?;
    let metadata: serde_json::Value = serde_json::from_str(&metadata_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "metadata_json".into(), rusqlite::types::Type::Text))?;
    Ok(TaskArtifact {
        id: Some(TaskArtifactId::from_string(row.get::<_, String>("id")?)),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        task_id: row.get::<_, Option<String>>("task_id")?.map(TaskId::from_string),
        artifact_type: row.get("artifact_type")?,
        title: row.get("title")?,
        content: row.get("content")?,
        file_path: row.get("file_path")?,
        url: row.get("url")?,
        metadata,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    pub fn insert_artifact(&self, artifact: &TaskArtifact) -> StorageResult<TaskArtifact> {
        let id = artifact.id.unwrap_or_else(TaskArtifactId::new);
        let metadata_json = serde_json::to_string(&artifact.metadata)
            .map_err(|source| crate::error::StorageError::Json { column: "metadata_json", source })?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO task_artifacts (
                id, project_id, task_id, artifact_type, title, content, file_path, url, metadata_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id.as_str(),
                artifact.project_id.as_str(),
                artifact.task_id.map(|t| t.to_string()),
                artifact.artifact_type,
                artifact.title,
                artifact.content,
                artifact.file_path,
                artifact.url,
                metadata_json,
                artifact.created_at,
            ],
        )?;
        Ok(TaskArtifact { id: Some(id), ..artifact.clone() })
    }

    pub fn list_artifacts_for_project(&self, project_id: &ProjectId) -> StorageResult<Vec<TaskArtifact>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM task_artifacts WHERE project_id = ?1 ORDER BY created_at")?;
        let rows = stmt.query_map(params![project_id.as_str()], row_to_artifact)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
