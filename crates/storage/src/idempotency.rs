// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Dispatch idempotency cache, keyed by `(task_id, idempotency_key)`.

use crate::error::StorageResult;
use crate::store::Store;
use crew_core::{IdempotencyKey, IdempotencyRecord};
use rusqlite::{params, OptionalExtension, Row};

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<IdempotencyRecord> {
    let response_json: String = row.get("response_json")?;
    let response_json: serde_json::Value = serde_json::from_str(&response_json)
        .map_err(|_| rusqlite::Error::InvalidColumnType(0, "response_json".into(), rusqlite::types::Type::Text))?;
    Ok(IdempotencyRecord {
        task_id: row.get("task_id")?,
        idempotency_key: IdempotencyKey(row.get("idempotency_key")?),
        response_json,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    /// Caches a dispatch outcome. A retry with the same key is a no-op —
    /// the original response always wins.
    pub fn insert_idempotency_record(&self, record: &IdempotencyRecord) -> StorageResult<()> {
        let response_json = serde_json::to_string(&record.response_json)
            .map_err(|source| crate::error::StorageError::Json { column: "response_json", source })?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO action_idempotency (task_id, idempotency_key, response_json, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(task_id, idempotency_key) DO NOTHING",
            params![record.task_id, record.idempotency_key.as_str(), response_json, record.created_at],
        )?;
        Ok(())
    }

    pub fn get_idempotency_record(&self, task_id: &str, key: &IdempotencyKey) -> StorageResult<Option<IdempotencyRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT * FROM action_idempotency WHERE task_id = ?1 AND idempotency_key = ?2",
            params![task_id, key.as_str()],
            row_to_record,
        )
        .optional()
        .map_err(crate::error::StorageError::from)
    }
}

#[cfg(test)]
#[path = "idempotency_tests.rs"]
mod tests;
