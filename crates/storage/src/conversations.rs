// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for persisted conversation turns, the raw history the Provider
//! Router's context summarizer compresses before each call.

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::{ConversationPhase, ConversationRole, ConversationTurn, ProjectId};
use rusqlite::{params, Row};
use serde_json::Value;

fn role_from_str(raw: &str) -> StorageResult<ConversationRole> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "conversations.role", source })
}

fn phase_from_str(raw: &str) -> StorageResult<ConversationPhase> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "conversations.phase", source })
}

fn row_to_turn(row: &Row<'_>) -> rusqlite::Result<ConversationTurn> {
    let role_raw: String = row.get("role")?;
    let role = role_from_str(&role_raw)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "role".into(), rusqlite::types::Type::Text))?;
    let phase_raw: String = row.get("phase")?;
    let phase = phase_from_str(&phase_raw)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "phase".into(), rusqlite::types::Type::Text))?;
    Ok(ConversationTurn {
        id: Some(row.get("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        role,
        content: row.get("content")?,
        token_count: row.get("token_count")?,
        phase,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    pub fn insert_conversation_turn(&self, turn: &ConversationTurn) -> StorageResult<ConversationTurn> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO conversations (project_id, role, content, token_count, phase, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                turn.project_id.as_str(),
                turn.role.to_string(),
                turn.content,
                turn.token_count,
                turn.phase.to_string(),
                turn.created_at,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(ConversationTurn { id: Some(id), ..turn.clone() })
    }

    /// Turns for a project/phase in occurrence order — the sequence the
    /// summarizer walks to decide what to compress.
    pub fn list_conversation_turns(&self, project_id: &ProjectId, phase: ConversationPhase) -> StorageResult<Vec<ConversationTurn>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM conversations WHERE project_id = ?1 AND phase = ?2 ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![project_id.as_str(), phase.to_string()], row_to_turn)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Replaces all turns for a project/phase with a fresh set — used when
    /// the summarizer collapses older turns into one summary turn.
    pub fn replace_conversation_turns(&self, project_id: &ProjectId, phase: ConversationPhase, turns: &[ConversationTurn]) -> StorageResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM conversations WHERE project_id = ?1 AND phase = ?2",
            params![project_id.as_str(), phase.to_string()],
        )?;
        for turn in turns {
            tx.execute(
                "INSERT INTO conversations (project_id, role, content, token_count, phase, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    turn.project_id.as_str(),
                    turn.role.to_string(),
                    turn.content,
                    turn.token_count,
                    turn.phase.to_string(),
                    turn.created_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "conversations_tests.rs"]
mod tests;
