// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The durable store: a single sqlite file behind a mutex.
//!
//! Crewline runs one Gateway process per deployment, so a single
//! connection serialized by a mutex is simpler than a pool and avoids
//! sqlite's own writer-lock contention under concurrent access.

use crate::error::StorageResult;
use crate::migrations;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    pub(crate) conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        migrations::apply(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        migrations::apply(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
