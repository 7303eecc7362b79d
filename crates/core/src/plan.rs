// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Synthesized project plans: an ordered list of milestones produced
//! from captured ideas, with exactly one active plan per project.

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a plan version.
    pub struct PlanId("pln-");
}

/// A named grouping of consecutive tasks, used for progress reporting
/// (`milestone_started` / `milestone_review` events).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
}

impl Milestone {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self { name: if name.trim().is_empty() { "General".to_string() } else { name } }
    }
}

/// A synthesized plan belonging to a project.
///
/// Plans are versioned and monotonic: generating a new plan deactivates
/// whichever plan was previously active, it never overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlanId>,
    pub project_id: ProjectId,
    pub version: u32,
    pub summary: String,
    /// Free-form narrative timeline, as returned by plan synthesis.
    #[serde(default)]
    pub timeline: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Builds the first plan version for a project (`version` 1, active).
    pub fn first(project_id: ProjectId, summary: impl Into<String>, milestones: Vec<Milestone>, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            project_id,
            version: 1,
            summary: summary.into(),
            timeline: Vec::new(),
            milestones,
            is_active: true,
            created_at: now,
        }
    }

    /// Builds the plan that supersedes `prior`, bumping the version.
    pub fn supersede(prior: &Plan, summary: impl Into<String>, milestones: Vec<Milestone>, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            project_id: prior.project_id,
            version: prior.version + 1,
            summary: summary.into(),
            timeline: Vec::new(),
            milestones,
            is_active: true,
            created_at: now,
        }
    }
}

crate::builder! {
    pub struct PlanBuilder => Plan {
        set {
            project_id: ProjectId = ProjectId::new(),
            version: u32 = 1,
            is_active: bool = true,
        }
        into {
            summary: String = "build a todo app",
        }
        option {
            id: PlanId = None,
        }
        computed {
            timeline: Vec<String> = Vec::new(),
            milestones: Vec<Milestone> = vec![Milestone::new("Scaffold")],
            created_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
