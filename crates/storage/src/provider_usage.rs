// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Per-provider daily quota accounting.

use crate::error::StorageResult;
use crate::store::Store;
use chrono::NaiveDate;
use crew_core::ProviderUsage;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_usage(row: &Row<'_>) -> rusqlite::Result<ProviderUsage> {
    Ok(ProviderUsage {
        id: Some(row.get("id")?),
        provider_name: row.get("provider_name")?,
        date: row.get("date")?,
        requests_used: row.get("requests_used")?,
        tokens_used: row.get::<_, i64>("tokens_used")? as u64,
        errors: row.get("errors")?,
        last_request_at: row.get("last_request_at")?,
    })
}

impl Store {
    /// Inserts or overwrites the usage row for `(provider_name, date)`.
    pub fn upsert_provider_usage(&self, usage: &ProviderUsage) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO provider_usage (provider_name, date, requests_used, tokens_used, errors, last_request_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(provider_name, date) DO UPDATE SET
                requests_used = excluded.requests_used,
                tokens_used = excluded.tokens_used,
                errors = excluded.errors,
                last_request_at = excluded.last_request_at",
            params![
                usage.provider_name,
                usage.date,
                usage.requests_used,
                usage.tokens_used as i64,
                usage.errors,
                usage.last_request_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_provider_usage(&self, provider_name: &str, date: NaiveDate) -> StorageResult<Option<ProviderUsage>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT * FROM provider_usage WHERE provider_name = ?1 AND date = ?2",
            params![provider_name, date],
            row_to_usage,
        )
        .optional()
        .map_err(crate::error::StorageError::from)
    }
}

#[cfg(test)]
#[path = "provider_usage_tests.rs"]
mod tests;
