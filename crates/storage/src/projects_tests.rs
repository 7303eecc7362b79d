// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use crew_core::ProjectStatus;

fn store() -> Store {
    Store::open_in_memory().unwrap()
}

#[yare::parameterized(
    ideation = { ProjectStatus::Ideation },
    coding = { ProjectStatus::Coding },
    completed = { ProjectStatus::Completed },
)]
fn status_round_trips(status: ProjectStatus) {
    assert_eq!(status_from_str(&status.to_string()).unwrap(), status);
}

#[test]
fn insert_and_get_round_trips() {
    let store = store();
    let project = Project::builder().name("alpha").display_name("Alpha").build();
    store.insert_project(&project).unwrap();

    let fetched = store.get_project(&project.id).unwrap().unwrap();
    assert_eq!(fetched.id, project.id);
    assert_eq!(fetched.name, "alpha");
    assert_eq!(fetched.status, ProjectStatus::Ideation);
}

#[test]
fn get_missing_project_returns_none() {
    let store = store();
    let missing = ProjectId::new();
    assert!(store.get_project(&missing).unwrap().is_none());
}

#[test]
fn update_missing_project_is_not_found() {
    let store = store();
    let project = Project::builder().build();
    let err = store.update_project(&project).unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "project", .. }));
}

#[test]
fn update_persists_status_transition() {
    let store = store();
    let mut project = Project::builder().name("beta").build();
    store.insert_project(&project).unwrap();

    project.status = ProjectStatus::Planning;
    store.update_project(&project).unwrap();

    let fetched = store.get_project(&project.id).unwrap().unwrap();
    assert_eq!(fetched.status, ProjectStatus::Planning);
}

#[test]
fn list_active_projects_excludes_terminal_statuses() {
    let store = store();
    let mut active = Project::builder().name("active").build();
    let mut done = Project::builder().name("done").build();
    done.status = ProjectStatus::Completed;
    active.status = ProjectStatus::Coding;
    store.insert_project(&active).unwrap();
    store.insert_project(&done).unwrap();

    let listed = store.list_active_projects().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, active.id);
}

#[test]
fn get_project_by_name_looks_up_unique_slug() {
    let store = store();
    let project = Project::builder().name("gamma").build();
    store.insert_project(&project).unwrap();

    let fetched = store.get_project_by_name("gamma").unwrap().unwrap();
    assert_eq!(fetched.id, project.id);
    assert!(store.get_project_by_name("missing").unwrap().is_none());
}
