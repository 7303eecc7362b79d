// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! CRUD for the chat front-end's thin user profile table.

use crate::error::{StorageError, StorageResult};
use crate::store::Store;
use crew_core::UserProfile;
use rusqlite::{params, OptionalExtension, Row};

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: Some(row.get("id")?),
        chat_user_id: row.get("chat_user_id")?,
        username: row.get("username")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        timezone: row.get("timezone")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        last_seen_at: row.get("last_seen_at")?,
    })
}

impl Store {
    pub fn upsert_user(&self, user: &UserProfile) -> StorageResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (chat_user_id, username, first_name, last_name, timezone, created_at, updated_at, last_seen_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(chat_user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                timezone = excluded.timezone,
                updated_at = excluded.updated_at,
                last_seen_at = excluded.last_seen_at",
            params![
                user.chat_user_id,
                user.username,
                user.first_name,
                user.last_name,
                user.timezone,
                user.created_at,
                user.updated_at,
                user.last_seen_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, chat_user_id: i64) -> StorageResult<Option<UserProfile>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT * FROM users WHERE chat_user_id = ?1", params![chat_user_id], row_to_user)
            .optional()
            .map_err(StorageError::from)
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
