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
fn insert_plan_assigns_id_when_absent() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);

    let plan = Plan::first(project_id, "build a todo app", vec![Milestone::new("Scaffold")], chrono::Utc::now());
    assert!(plan.id.is_none());
    let saved = store.insert_plan(&plan).unwrap();
    assert!(saved.id.is_some());
}

#[test]
fn inserting_a_new_plan_deactivates_the_prior_one() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);

    let first = store
        .insert_plan(&Plan::first(project_id, "v1", vec![Milestone::new("Scaffold")], chrono::Utc::now()))
        .unwrap();
    let second = store
        .insert_plan(&Plan::supersede(&first, "v2", vec![Milestone::new("Ship")], chrono::Utc::now()))
        .unwrap();

    let active = store.get_active_plan(&project_id).unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_eq!(active.version, 2);

    let all = store.list_plans_for_project(&project_id).unwrap();
    assert_eq!(all.len(), 2);
    assert!(!all.iter().find(|p| p.id == first.id).unwrap().is_active);
}

#[test]
fn get_active_plan_is_none_for_plan_free_project() {
    let store = Store::open_in_memory().unwrap();
    let project_id = seeded_project(&store);
    assert!(store.get_active_plan(&project_id).unwrap().is_none());
}
