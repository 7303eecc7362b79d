// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use crew_core::Project;

fn seeded_project(store: &Store) -> ProjectId {
    let project = Project::builder().build();
    store.insert_project(&project).unwrap();
    project.id
}

#[test]
fn upsert_agent_record_inserts_then_updates_in_place() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);

    let mut record = AgentRecord::builder().project_id(project_id).role("backend").build();
    store.upsert_agent_record(&record).unwrap();

    record.mark_running(chrono::Utc::now());
    store.upsert_agent_record(&record).unwrap();

    let fetched = store.get_agent_record(&project_id, "backend").unwrap().unwrap();
    assert_eq!(fetched.status, AgentRecordStatus::Running);
    assert_eq!(fetched.id, record.id);
}

#[test]
fn get_agent_record_is_none_before_first_upsert() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);
    assert!(store.get_agent_record(&project_id, "backend").unwrap().is_none());
}

#[test]
fn insert_and_update_agent_run_round_trips() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);
    let record = AgentRecord::builder().project_id(project_id).build();
    store.upsert_agent_record(&record).unwrap();

    let mut run = AgentRun::builder().project_id(project_id).agent_id(record.id).build();
    store.insert_agent_run(&run).unwrap();

    run.heartbeat(chrono::Utc::now());
    store.update_agent_run(&run).unwrap();

    let running = store.list_running_agent_runs().unwrap();
    assert_eq!(running.len(), 1);
    assert_eq!(running[0].id, run.id);
}

#[test]
fn list_running_agent_runs_excludes_finished() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);
    let record = AgentRecord::builder().project_id(project_id).build();
    store.upsert_agent_record(&record).unwrap();

    let mut run = AgentRun::builder().project_id(project_id).agent_id(record.id).build();
    store.insert_agent_run(&run).unwrap();
    run.finish(AgentRunStatus::Succeeded, chrono::Utc::now());
    store.update_agent_run(&run).unwrap();

    assert!(store.list_running_agent_runs().unwrap().is_empty());
}
