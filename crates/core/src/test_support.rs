// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::plan::{Milestone, Plan};
use crate::project::{Project, ProjectId};
use crate::task::{Task, TaskStatus};

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::project::ProjectStatus;
    use crate::task::TaskStatus;
    use proptest::prelude::*;

    pub fn arb_task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Failed),
            Just(TaskStatus::Skipped),
        ]
    }

    pub fn arb_project_status() -> impl Strategy<Value = ProjectStatus> {
        prop_oneof![
            Just(ProjectStatus::Ideation),
            Just(ProjectStatus::Planning),
            Just(ProjectStatus::Approved),
            Just(ProjectStatus::Coding),
            Just(ProjectStatus::Testing),
            Just(ProjectStatus::Paused),
            Just(ProjectStatus::Completed),
            Just(ProjectStatus::Failed),
            Just(ProjectStatus::Cancelled),
        ]
    }
}

/// Builds a project with one active plan carrying `titles.len()` tasks, all
/// in a single "Scaffold" milestone, in declared order.
pub fn project_with_plan_and_tasks(project_id: ProjectId, titles: &[&str]) -> (Project, Plan, Vec<Task>) {
    let project = Project::builder().id(project_id).build();
    let plan = Plan::builder().project_id(project.id).build();
    let tasks = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            Task::builder()
                .project_id(project.id)
                .plan_id(plan.id.unwrap_or_else(|| crate::plan::PlanId::new()))
                .title(*title)
                .order_index(i as u32)
                .build()
        })
        .collect();
    (project, plan, tasks)
}

pub fn completed_task(title: &str) -> Task {
    Task::builder().title(title).status(TaskStatus::Completed).build()
}

pub fn milestone(name: &str) -> Milestone {
    Milestone::new(name)
}
