// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Persisted chat history per project/phase, the raw material the
//! Provider Router's context-window summarizer compresses before each
//! call (spec §4.3, "Context sizing").

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role tag on a stored turn, mirroring the roles an LLM chat API
/// distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationRole {
    System,
    User,
    Assistant,
    ToolResult,
}

crate::simple_display! {
    ConversationRole {
        System => "system",
        User => "user",
        Assistant => "assistant",
        ToolResult => "tool_result",
    }
}

/// Which orchestration phase a turn belongs to, so the summarizer can
/// compress a project's `coding` history independently of its `planning`
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Planning,
    Coding,
    Testing,
}

crate::simple_display! {
    ConversationPhase {
        Planning => "planning",
        Coding => "coding",
        Testing => "testing",
    }
}

/// A single stored conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project_id: ProjectId,
    pub role: ConversationRole,
    pub content: String,
    #[serde(default)]
    pub token_count: u32,
    pub phase: ConversationPhase,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        project_id: ProjectId,
        role: ConversationRole,
        content: impl Into<String>,
        phase: ConversationPhase,
        now: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let token_count = estimate_tokens(&content);
        Self { id: None, project_id, role, content, token_count, phase, created_at: now }
    }
}

/// Cheap token estimate (~4 bytes/token) used when a provider doesn't
/// report usage; good enough to size history against a context window
/// without depending on any one vendor's tokenizer.
pub fn estimate_tokens(text: &str) -> u32 {
    ((text.len() as f64) / 4.0).ceil() as u32
}

crate::builder! {
    pub struct ConversationTurnBuilder => ConversationTurn {
        set {
            project_id: ProjectId = ProjectId::new(),
            role: ConversationRole = ConversationRole::User,
            token_count: u32 = 0,
            phase: ConversationPhase = ConversationPhase::Coding,
        }
        into {
            content: String = "hello",
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
#[path = "conversation_tests.rs"]
mod tests;
