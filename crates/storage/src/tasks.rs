// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for plan tasks. Ordering within a plan is `order_index`; the
//! Worker pulls the lowest-order pending task as the next unit of work.

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::{PlanId, ProjectId, Task, TaskId, TaskStatus};
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

fn status_from_str(raw: &str) -> StorageResult<TaskStatus> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|source| StorageError::Json { column: "tasks.status", source })
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status_raw: String = row.get("status")?;
    let status = status_from_str(&status_raw)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "status".into(), rusqlite::types::Type::Text))?;
    Ok(Task {
        id: Some(TaskId::from_string(row.get::<_, String>("id")?)),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        plan_id: PlanId::from_string(row.get::<_, String>("plan_id")?),
        milestone: row.get("milestone")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        order_index: row.get("order_index")?,
        assigned_agent_role: row.get("assigned_agent_role")?,
        result_summary: row.get("result_summary")?,
        error_message: row.get("error_message")?,
        started_at: row.get("started_at")?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    pub fn insert_task(&self, task: &Task) -> StorageResult<Task> {
        let id = task.id.unwrap_or_else(TaskId::new);
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (
                id, project_id, plan_id, milestone, title, description, status, order_index,
                assigned_agent_role, result_summary, error_message, started_at, completed_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                id.as_str(),
                task.project_id.as_str(),
                task.plan_id.as_str(),
                task.milestone,
                task.title,
                task.description,
                task.status.to_string(),
                task.order_index,
                task.assigned_agent_role,
                task.result_summary,
                task.error_message,
                task.started_at,
                task.completed_at,
                task.created_at,
            ],
        )?;
        Ok(Task { id: Some(id), ..task.clone() })
    }

    /// Persists the mutable fields of a task that change as it runs:
    /// status, timestamps, and the final result/error summary.
    pub fn update_task(&self, task: &Task) -> StorageResult<()> {
        let id = task.id.ok_or(StorageError::NotFound { entity: "task", id: "<unassigned>".into() })?;
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE tasks SET status = ?2, result_summary = ?3, error_message = ?4,
                started_at = ?5, completed_at = ?6 WHERE id = ?1",
            params![
                id.as_str(),
                task.status.to_string(),
                task.result_summary,
                task.error_message,
                task.started_at,
                task.completed_at,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "task", id: id.to_string() });
        }
        Ok(())
    }

    pub fn get_task(&self, id: &TaskId) -> StorageResult<Option<Task>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id.as_str()], row_to_task)
            .optional()
            .map_err(StorageError::from)
    }

    pub fn list_tasks_for_plan(&self, plan_id: &PlanId) -> StorageResult<Vec<Task>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM tasks WHERE plan_id = ?1 ORDER BY order_index")?;
        let rows = stmt.query_map(params![plan_id.as_str()], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// The lowest-order `pending` task in a plan, if one remains.
    pub fn next_pending_task(&self, plan_id: &PlanId) -> StorageResult<Option<Task>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT * FROM tasks WHERE plan_id = ?1 AND status = 'pending' ORDER BY order_index LIMIT 1",
            params![plan_id.as_str()],
            row_to_task,
        )
        .optional()
        .map_err(StorageError::from)
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
