// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Append-only project event log, fanned out to the chat front-end.

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::{ProjectEvent, ProjectEventKind, ProjectId};
use rusqlite::{params, Row};

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<ProjectEvent> {
    let event_json: String = row.get("event_json")?;
    let kind: ProjectEventKind = serde_json::from_str(&event_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "event_json".into(), rusqlite::types::Type::Text))?;
    Ok(ProjectEvent {
        id: Some(row.get("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        kind,
        summary: row.get("summary")?,
        detail: row.get("detail")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    pub fn insert_event(&self, event: &ProjectEvent) -> StorageResult<ProjectEvent> {
        let event_json = serde_json::to_string(&event.kind)
            .map_err(|source| StorageError::Json { column: "event_json", source })?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO project_events (project_id, event_json, summary, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event.project_id.as_str(), event_json, event.summary, event.detail, event.created_at],
        )?;
        let id = conn.last_insert_rowid();
        Ok(ProjectEvent { id: Some(id), ..event.clone() })
    }

    /// Events for a project, oldest first — the order the front-end replays them in.
    pub fn list_events_for_project(&self, project_id: &ProjectId) -> StorageResult<Vec<ProjectEvent>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM project_events WHERE project_id = ?1 ORDER BY created_at, id")?;
        let rows = stmt.query_map(params![project_id.as_str()], row_to_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Events for a project strictly after `after_id`, for incremental polling.
    pub fn list_events_since(&self, project_id: &ProjectId, after_id: i64) -> StorageResult<Vec<ProjectEvent>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT * FROM project_events WHERE project_id = ?1 AND id > ?2 ORDER BY id")?;
        let rows = stmt.query_map(params![project_id.as_str(), after_id], row_to_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
