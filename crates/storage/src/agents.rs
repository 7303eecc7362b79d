// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for agent records (one per project+role) and agent runs (one per
//! task execution attempt).

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::{
    AgentRecord, AgentRecordId, AgentRecordStatus, AgentRun, AgentRunId, AgentRunMetadata, AgentRunStatus, ProjectId,
    TaskId,
};
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

fn record_status_from_str(raw: &str) -> StorageResult<AgentRecordStatus> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "agents.status", source })
}

fn run_status_from_str(raw: &str) -> StorageResult<AgentRunStatus> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "agent_runs.status", source })
}

fn row_to_agent_record(row: &Row<'_>) -> rusqlite::Result<AgentRecord> {
    let status_raw: String = row.get("status")?;
    let status = record_status_from_str(&status_raw)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "status".into(), rusqlite::types::Type::Text))?;
    Ok(AgentRecord {
        id: AgentRecordId::from_string(row.get::<_, String>("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        role: row.get("role")?,
        status,
        tasks_completed: row.get("tasks_completed")?,
        total_tokens: row.get::<_, i64>("total_tokens")? as u64,
        created_at: row.get("created_at")?,
        last_active_at: row.get("last_active_at")?,
    })
}

fn row_to_agent_run(row: &Row<'_>) -> rusqlite::Result<AgentRun> {
    let status_raw: String = row.get("status")?;
    let status = run_status_from_str(&status_raw)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "status".into(), rusqlite::types::Type::Text))?;
    let metadata_json: String = row.get("metadata_json")?;
    let metadata: AgentRunMetadata = serde_json::from_str(&metadata_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "metadata_json".into(), rusqlite::types::Type::Text))?;
    Ok(AgentRun {
        id: AgentRunId::from_string(row.get::<_, String>("id")?),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        task_id: row.get::<_, Option<String>>("task_id")?.map(TaskId::from_string),
        agent_id: AgentRecordId::from_string(row.get::<_, String>("agent_id")?),
        agent_role: row.get("agent_role")?,
        status,
        started_at: row.get("started_at")?,
        heartbeat_at: row.get("heartbeat_at")?,
        finished_at: row.get("finished_at")?,
        error_message: row.get("error_message")?,
        metadata,
    })
}

impl Store {
    pub fn upsert_agent_record(&self, record: &AgentRecord) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO agents (id, project_id, role, status, tasks_completed, total_tokens, created_at, last_active_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(project_id, role) DO UPDATE SET
                status = excluded.status,
                tasks_completed = excluded.tasks_completed,
                total_tokens = excluded.total_tokens,
                last_active_at = excluded.last_active_at",
            params![
                record.id.as_str(),
                record.project_id.as_str(),
                record.role,
                record.status.to_string(),
                record.tasks_completed,
                record.total_tokens as i64,
                record.created_at,
                record.last_active_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_agent_record(&self, project_id: &ProjectId, role: &str) -> StorageResult<Option<AgentRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT * FROM agents WHERE project_id = ?1 AND role = ?2",
            params![project_id.as_str(), role],
            row_to_agent_record,
        )
        .optional()
        .map_err(StorageError::from)
    }

    pub fn insert_agent_run(&self, run: &AgentRun) -> StorageResult<()> {
        let metadata_json = serde_json::to_string(&run.metadata)
            .map_err(|source| StorageError::Json { column: "metadata_json", source })?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO agent_runs (
                id, project_id, task_id, agent_id, agent_role, status, started_at, heartbeat_at,
                finished_at, error_message, metadata_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                run.id.as_str(),
                run.project_id.as_str(),
                run.task_id.map(|t| t.to_string()),
                run.agent_id.as_str(),
                run.agent_role,
                run.status.to_string(),
                run.started_at,
                run.heartbeat_at,
                run.finished_at,
                run.error_message,
                metadata_json,
            ],
        )?;
        Ok(())
    }

    /// Persists a heartbeat touch or terminal-status transition.
    pub fn update_agent_run(&self, run: &AgentRun) -> StorageResult<()> {
        let metadata_json = serde_json::to_string(&run.metadata)
            .map_err(|source| StorageError::Json { column: "metadata_json", source })?;
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE agent_runs SET status = ?2, heartbeat_at = ?3, finished_at = ?4,
                error_message = ?5, metadata_json = ?6 WHERE id = ?1",
            params![
                run.id.as_str(),
                run.status.to_string(),
                run.heartbeat_at,
                run.finished_at,
                run.error_message,
                metadata_json,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "agent_run", id: run.id.to_string() });
        }
        Ok(())
    }

    /// All runs still in the `running` state, for the stall watcher.
    pub fn list_running_agent_runs(&self) -> StorageResult<Vec<AgentRun>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM agent_runs WHERE status = 'running'")?;
        let rows = stmt.query_map([], row_to_agent_run)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
#[path = "agents_tests.rs"]
mod tests;
