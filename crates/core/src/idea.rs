// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Raw idea messages captured before plan synthesis.

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text message the user sent during the ideation phase, kept
/// around so the Project Manager can re-synthesize a plan from the
/// full conversation if the operator asks for revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    /// Storage-assigned sequence number; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project_id: ProjectId,
    pub message_text: String,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(project_id: ProjectId, message_text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { id: None, project_id, message_text: message_text.into(), created_at: now }
    }
}

crate::builder! {
    pub struct IdeaBuilder => Idea {
        set {
            project_id: ProjectId = ProjectId::new(),
        }
        into {
            message_text: String = "build me a todo app",
        }
        option {
            id: i64 = None,
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "idea_tests.rs"]
mod tests;
