// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn apply_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    apply(&conn).unwrap();
    apply(&conn).unwrap();
}

#[test]
fn all_tables_exist_after_apply() {
    let conn = Connection::open_in_memory().unwrap();
    apply(&conn).unwrap();
    let tables = [
        "projects", "ideas", "plans", "tasks", "agents", "conversations", "provider_usage",
        "project_events", "action_idempotency", "agent_runs", "task_artifacts", "users",
    ];
    for table in tables {
        let count: i64 = conn
            .query_row("SELECT count(*) FROM sqlite_master WHERE type='table' AND name = ?1", [table], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1, "missing table {table}");
    }
}
