// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn milestone_name_blank_becomes_general() {
    assert_eq!(Milestone::new("").name, "General");
    assert_eq!(Milestone::new("   ").name, "General");
    assert_eq!(Milestone::new("Scaffold").name, "Scaffold");
}

#[test]
fn first_plan_is_version_one_and_active() {
    let plan = Plan::first(ProjectId::new(), "summary", vec![Milestone::new("Scaffold")], Utc::now());
    assert_eq!(plan.version, 1);
    assert!(plan.is_active);
    assert!(plan.id.is_none());
}

#[test]
fn superseding_plan_bumps_version_and_keeps_project() {
    let prior = Plan::first(ProjectId::new(), "v1", vec![Milestone::new("A")], Utc::now());
    let next = Plan::supersede(&prior, "v2", vec![Milestone::new("B")], Utc::now());
    assert_eq!(next.version, 2);
    assert_eq!(next.project_id, prior.project_id);
    assert!(next.is_active);
}

#[test]
fn builder_omits_id_from_json_when_unset() {
    let plan = Plan::builder().build();
    let json = serde_json::to_value(&plan).unwrap();
    assert!(json.get("id").is_none());
}
