// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for captured ideation messages.

use crate::error::StorageResult;
use crate::store::Store;
use crew_core::{Idea, ProjectId};
use rusqlite::{params, Row};

fn row_to_idea(row: &Row<'_>) -> rusqlite::Result<Idea> {
    Ok(Idea {
        id: Some(row.get("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        message_text: row.get("message_text")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    /// Inserts an idea and returns it with its assigned row id.
    pub fn insert_idea(&self, idea: &Idea) -> StorageResult<Idea> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO ideas (project_id, message_text, created_at) VALUES (?1, ?2, ?3)",
            params![idea.project_id.as_str(), idea.message_text, idea.created_at],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Idea { id: Some(id), ..idea.clone() })
    }

    /// All ideas captured for a project, in capture order — the full
    /// conversation a plan can be re-synthesized from.
    pub fn list_ideas_for_project(&self, project_id: &ProjectId) -> StorageResult<Vec<Idea>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM ideas WHERE project_id = ?1 ORDER BY created_at, id")?;
        let rows = stmt.query_map(params![project_id.as_str()], row_to_idea)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
#[path = "ideas_tests.rs"]
mod tests;
