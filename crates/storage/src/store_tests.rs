// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn open_in_memory_runs_migrations() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn.lock();
    let count: i64 = conn
        .query_row("SELECT count(*) FROM sqlite_master WHERE type='table' AND name = 'projects'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_file_backed_store_persists_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crewline.sqlite3");
    {
        let store = Store::open(&path).unwrap();
        drop(store);
    }
    let store = Store::open(&path).unwrap();
    let conn = store.conn.lock();
    let count: i64 = conn
        .query_row("SELECT count(*) FROM sqlite_master WHERE type='table' AND name = 'tasks'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
