// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for synthesized plans. Exactly one plan per project may have
//! `is_active = 1`; [`Store::insert_plan`] enforces this by deactivating
//! any prior active plan in the same transaction.

use crate::error::StorageResult;
use crate::store::Store;
use crew_core::{Milestone, Plan, PlanId, ProjectId};
use rusqlite::{params, OptionalExtension, Row};

fn row_to_plan(row: &Row<'_>) -> rusqlite::Result<Plan> {
    let timeline_json: String = row.get("timeline_json")?;
    let milestones_json: String = row.get("milestones_json")?;
    let timeline: Vec<String> = serde_json::from_str(&timeline_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "timeline_json".into(), rusqlite::types::Type::Text))?;
    let milestones: Vec<Milestone> = serde_json::from_str(&milestones_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "milestones_json".into(), rusqlite::types::Type::Text))?;
    Ok(Plan {
        id: Some(PlanId::from_string(row.get::<_, String>("id")?)),
        project_id: ProjectId::from_string(row.get::<_, String>("project_id")?),
        version: row.get("version")?,
        summary: row.get("summary")?,
        timeline,
        milestones,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    /// Inserts `plan` as the new active plan, deactivating whatever plan was
    /// previously active for the same project. Assigns a fresh id if `plan.id`
    /// is `None`.
    pub fn insert_plan(&self, plan: &Plan) -> StorageResult<Plan> {
        let id = plan.id.unwrap_or_else(PlanId::new);
        let timeline_json = serde_json::to_string(&plan.timeline)
            .map_err(|source| crate::error::StorageError::Json { column: "timeline_json", source })?;
        let milestones_json = serde_json::to_string(&plan.milestones)
            .map_err(|source| crate::error::StorageError::Json { column: "milestones_json", source })?;

        let conn = self.conn.lock();
        conn.execute(
            "UPDATE plans SET is_active = 0 WHERE project_id = ?1 AND is_active = 1",
            params![plan.project_id.as_str()],
        )?;
        conn.execute(
            "INSERT INTO plans (id, project_id, version, summary, timeline_json, milestones_json, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.as_str(),
                plan.project_id.as_str(),
                plan.version,
                plan.summary,
                timeline_json,
                milestones_json,
                plan.is_active,
                plan.created_at,
            ],
        )?;
        Ok(Plan { id: Some(id), ..plan.clone() })
    }

    pub fn get_active_plan(&self, project_id: &ProjectId) -> StorageResult<Option<Plan>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT * FROM plans WHERE project_id = ?1 AND is_active = 1",
            params![project_id.as_str()],
            row_to_plan,
        )
        .optional()
        .map_err(crate::error::StorageError::from)
    }

    pub fn list_plans_for_project(&self, project_id: &ProjectId) -> StorageResult<Vec<Plan>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM plans WHERE project_id = ?1 ORDER BY version")?;
        let rows = stmt.query_map(params![project_id.as_str()], row_to_plan)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
#[path = "plans_tests.rs"]
mod tests;
