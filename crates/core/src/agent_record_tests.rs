// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn new_agent_record_starts_idle_with_no_activity() {
    let record = AgentRecord::new(ProjectId::new(), "backend", Utc::now());
    assert_eq!(record.status, AgentRecordStatus::Idle);
    assert_eq!(record.tasks_completed, 0);
    assert!(record.last_active_at.is_none());
}

#[test]
fn mark_running_sets_status_and_timestamp() {
    let mut record = AgentRecord::new(ProjectId::new(), "backend", Utc::now());
    let now = Utc::now();
    record.mark_running(now);
    assert_eq!(record.status, AgentRecordStatus::Running);
    assert_eq!(record.last_active_at, Some(now));
}

#[test]
fn mark_idle_after_task_accumulates_counters() {
    let mut record = AgentRecord::new(ProjectId::new(), "backend", Utc::now());
    record.mark_running(Utc::now());
    record.mark_idle_after_task(150, Utc::now());
    record.mark_idle_after_task(50, Utc::now());
    assert_eq!(record.status, AgentRecordStatus::Idle);
    assert_eq!(record.tasks_completed, 2);
    assert_eq!(record.total_tokens, 200);
}

#[test]
fn status_display_is_lowercase() {
    assert_eq!(AgentRecordStatus::Idle.to_string(), "idle");
    assert_eq!(AgentRecordStatus::Running.to_string(), "running");
}
