// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for the `projects` table.

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::{Project, ProjectId, ProjectStatus};
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;
use std::path::PathBuf;

fn status_from_str(raw: &str) -> StorageResult<ProjectStatus> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "projects.status", source })
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    let status_raw: String = row.get("status")?;
    let status = status_from_str(&status_raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "status".into(), rusqlite::types::Type::Text)
    })?;
    Ok(Project {
        id: ProjectId::from_string(row.get::<_, String>("id")?),
        name: row.get("name")?,
        display_name: row.get("display_name")?,
        description: row.get("description")?,
        status,
        local_path: PathBuf::from(row.get::<_, String>("local_path")?),
        remote_repo_url: row.get("remote_repo_url")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        approved_at: row.get("approved_at")?,
        completed_at: row.get("completed_at")?,
        bootstrap_result: row.get("bootstrap_result")?,
        bootstrap_summary: row.get("bootstrap_summary")?,
    })
}

impl Store {
    pub fn insert_project(&self, project: &Project) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO projects (
                id, name, display_name, description, status, local_path, remote_repo_url,
                created_at, updated_at, approved_at, completed_at, bootstrap_result, bootstrap_summary
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                project.id.as_str(),
                project.name,
                project.display_name,
                project.description,
                project.status.to_string(),
                project.local_path.to_string_lossy(),
                project.remote_repo_url,
                project.created_at,
                project.updated_at,
                project.approved_at,
                project.completed_at,
                project.bootstrap_result,
                project.bootstrap_summary,
            ],
        )?;
        Ok(())
    }

    pub fn update_project(&self, project: &Project) -> StorageResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE projects SET
                name = ?2, display_name = ?3, description = ?4, status = ?5, local_path = ?6,
                remote_repo_url = ?7, updated_at = ?8, approved_at = ?9, completed_at = ?10,
                bootstrap_result = ?11, bootstrap_summary = ?12
             WHERE id = ?1",
            params![
                project.id.as_str(),
                project.name,
                project.display_name,
                project.description,
                project.status.to_string(),
                project.local_path.to_string_lossy(),
                project.remote_repo_url,
                project.updated_at,
                project.approved_at,
                project.completed_at,
                project.bootstrap_result,
                project.bootstrap_summary,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "project", id: project.id.to_string() });
        }
        Ok(())
    }

    pub fn get_project(&self, id: &ProjectId) -> StorageResult<Option<Project>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT * FROM projects WHERE id = ?1", params![id.as_str()], |row| {
            row_to_project(row)
        })
        .optional()
        .map_err(StorageError::from)
    }

    pub fn get_project_by_name(&self, name: &str) -> StorageResult<Option<Project>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT * FROM projects WHERE name = ?1", params![name], row_to_project)
            .optional()
            .map_err(StorageError::from)
    }

    pub fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY created_at")?;
        let rows = stmt.query_map([], row_to_project)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn list_active_projects(&self) -> StorageResult<Vec<Project>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM projects WHERE status NOT IN ('completed', 'failed', 'cancelled') ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_project)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
