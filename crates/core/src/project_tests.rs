// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn new_project_starts_in_ideation_with_no_approval_or_completion() {
    let project = Project::new(ProjectId::new(), "alpha", "Alpha", Utc::now());
    assert_eq!(project.status, ProjectStatus::Ideation);
    assert!(project.approved_at.is_none());
    assert!(project.completed_at.is_none());
    assert!(project.approval_invariant_holds());
    assert!(project.completion_invariant_holds());
}

#[test]
fn approval_invariant_violated_when_approved_status_missing_timestamp() {
    let project = Project::builder().status(ProjectStatus::Coding).build();
    assert!(!project.approval_invariant_holds());
}

#[test]
fn approval_invariant_holds_once_approved_at_is_set() {
    let project = Project::builder()
        .status(ProjectStatus::Coding)
        .approved_at(Utc::now())
        .build();
    assert!(project.approval_invariant_holds());
}

#[test]
fn approval_invariant_holds_for_ideation_and_planning_without_timestamp() {
    for status in [ProjectStatus::Ideation, ProjectStatus::Planning] {
        let project = Project::builder().status(status).build();
        assert!(project.approval_invariant_holds(), "status {status} should not require approved_at");
    }
}

#[test]
fn completion_invariant_violated_when_completed_without_timestamp() {
    let project = Project::builder().status(ProjectStatus::Completed).build();
    assert!(!project.completion_invariant_holds());
}

#[test]
fn completion_invariant_holds_once_completed_at_is_set() {
    let project = Project::builder()
        .status(ProjectStatus::Completed)
        .completed_at(Utc::now())
        .build();
    assert!(project.completion_invariant_holds());
}

#[test]
fn completion_invariant_violated_when_non_completed_has_timestamp() {
    let project = Project::builder()
        .status(ProjectStatus::Failed)
        .completed_at(Utc::now())
        .build();
    assert!(!project.completion_invariant_holds());
}

#[test]
fn coding_and_testing_require_an_active_plan() {
    assert!(ProjectStatus::Coding.requires_active_plan());
    assert!(ProjectStatus::Testing.requires_active_plan());
    assert!(!ProjectStatus::Ideation.requires_active_plan());
    assert!(!ProjectStatus::Paused.requires_active_plan());
}

#[test]
fn terminal_statuses_are_completed_failed_cancelled() {
    assert!(ProjectStatus::Completed.is_terminal());
    assert!(ProjectStatus::Failed.is_terminal());
    assert!(ProjectStatus::Cancelled.is_terminal());
    assert!(!ProjectStatus::Paused.is_terminal());
    assert!(!ProjectStatus::Coding.is_terminal());
}

#[test]
fn status_display_matches_snake_case_wire_format() {
    assert_eq!(ProjectStatus::Ideation.to_string(), "ideation");
    assert_eq!(ProjectStatus::Cancelled.to_string(), "cancelled");
}

#[test]
fn status_serializes_as_snake_case_json_string() {
    let json = serde_json::to_string(&ProjectStatus::Coding).unwrap();
    assert_eq!(json, "\"coding\"");
}

#[test]
fn builder_omits_optional_fields_from_json_when_unset() {
    let project = Project::builder().build();
    let json = serde_json::to_value(&project).unwrap();
    assert!(json.get("remote_repo_url").is_none());
    assert!(json.get("approved_at").is_none());
    assert!(json.get("completed_at").is_none());
    assert!(json.get("bootstrap_result").is_none());
}

#[test]
fn builder_generates_distinct_ids_per_project() {
    let a = Project::builder().build();
    let b = Project::builder().build();
    assert_ne!(a.id, b.id);
}
