// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn start_creates_running_run_with_no_finish_time() {
    let run = AgentRun::start(ProjectId::new(), None, AgentRecordId::new(), "backend", Utc::now());
    assert_eq!(run.status, AgentRunStatus::Running);
    assert!(run.finished_at.is_none());
}

#[test]
fn heartbeat_updates_timestamp() {
    let mut run = AgentRun::start(ProjectId::new(), None, AgentRecordId::new(), "backend", Utc::now());
    let later = run.heartbeat_at + chrono::Duration::seconds(30);
    run.heartbeat(later);
    assert_eq!(run.heartbeat_at, later);
}

#[test]
fn is_stalled_when_heartbeat_older_than_threshold() {
    let mut run = AgentRun::start(ProjectId::new(), None, AgentRecordId::new(), "backend", Utc::now());
    let origin = run.heartbeat_at;
    let check_time = origin + chrono::Duration::seconds(125);
    assert!(run.is_stalled(check_time, chrono::Duration::seconds(120)));
    run.heartbeat(check_time);
    assert!(!run.is_stalled(check_time, chrono::Duration::seconds(120)));
}

#[test]
fn finished_run_is_never_stalled() {
    let mut run = AgentRun::start(ProjectId::new(), None, AgentRecordId::new(), "backend", Utc::now());
    let now = run.started_at;
    run.finish(AgentRunStatus::Succeeded, now);
    assert!(!run.is_stalled(now + chrono::Duration::hours(1), chrono::Duration::seconds(120)));
}

#[test]
fn finish_sets_status_and_finished_at() {
    let mut run = AgentRun::start(ProjectId::new(), None, AgentRecordId::new(), "backend", Utc::now());
    let now = Utc::now();
    run.finish(AgentRunStatus::Failed, now);
    assert_eq!(run.status, AgentRunStatus::Failed);
    assert_eq!(run.finished_at, Some(now));
}
