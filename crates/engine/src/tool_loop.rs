// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Tool/Skill Invocation Loop (spec §4.4): a bounded `tool_use` ↔
//! `tool_result` conversation between the Router and a task's assigned
//! role, with loop detection and provider escalation shared with the
//! Provider Router's own escalation chain (spec §4.3).
//!
//! Every tool dispatch this loop makes is idempotent (spec §9's resolved
//! open question): the key is derived from the tool name and its
//! canonicalized input, scoped to the task, and handed to
//! [`crate::dispatch::ChannelHandle`], which replays a cached response on
//! retry instead of dispatching twice.

use crate::dispatch::{ChannelHandle, DispatchError};
use crate::provider::{ChatRequest, Message, ProviderClass, ProviderError, ProviderRouter, TaskType, ToolCall};
use crate::skills::{ApprovalDecision, SkillRegistry};
use crew_adapters::{ChatAdapter, FallbackExecutor};
use crew_core::{ConversationPhase, ConversationRole, ConversationTurn, IdempotencyKey, ProjectId};
use crew_storage::Store;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on tool rounds per task (spec §4.4, "MAX_TOOL_ROUNDS").
pub const MAX_TOOL_ROUNDS: u32 = 30;

/// Empty responses in a row before the escalation chain advances (spec
/// §4.3, "Escalation").
const EMPTY_STREAK_LIMIT: u32 = 3;

/// Identical round signatures in a row before a loop is declared (spec
/// §4.3, "or the same tool call appears three times in the last three
/// rounds").
const LOOP_SIGNATURE_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum ToolLoopError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("storage error: {0}")]
    Storage(#[from] crew_storage::StorageError),
}

/// What the loop produced once it stopped issuing tool calls, whether by
/// a final plain-text response, round exhaustion, or escalation exhaustion.
#[derive(Debug, Clone)]
pub struct ToolLoopOutcome {
    pub text: String,
    pub rounds_used: u32,
    pub exhausted: bool,
    pub tokens_used: u64,
}

/// A single task invocation of the loop: everything it needs that isn't
/// already owned by the [`ToolLoop`] itself.
pub struct TaskContext<'a> {
    pub project_id: ProjectId,
    pub task_id: &'a str,
    pub role: &'a str,
    pub task_type: TaskType,
    pub task_description: &'a str,
    /// True once the project's plan has been approved — grants
    /// plan-scope approval to tools not individually gated (spec §4.4).
    pub plan_scope_approved: bool,
}

pub struct ToolLoop<F: FallbackExecutor> {
    router: Arc<ProviderRouter>,
    skills: Arc<SkillRegistry>,
    channel: Arc<ChannelHandle<F>>,
    store: Arc<Store>,
    chat: Arc<dyn ChatAdapter>,
}

impl<F: FallbackExecutor> ToolLoop<F> {
    pub fn new(router: Arc<ProviderRouter>, skills: Arc<SkillRegistry>, channel: Arc<ChannelHandle<F>>, store: Arc<Store>, chat: Arc<dyn ChatAdapter>) -> Self {
        Self { router, skills, channel, store, chat }
    }

    pub async fn run_task(&self, ctx: TaskContext<'_>) -> Result<ToolLoopOutcome, ToolLoopError> {
        let mut messages = self.load_history(ctx.project_id).await?;
        messages.push(Message::user(ctx.task_description.to_string()));
        self.persist_turn(ctx.project_id, ConversationRole::User, ctx.task_description).await?;

        let tools = self.skills.get_tools_for_role(ctx.role);
        let mut current_class = crate::provider::default_class_for_task(ctx.task_type);
        let mut empty_streak: u32 = 0;
        let mut recent_signatures: VecDeque<String> = VecDeque::with_capacity(LOOP_SIGNATURE_LIMIT);
        let mut tokens_used: u64 = 0;

        for round in 0..MAX_TOOL_ROUNDS {
            let request = ChatRequest {
                messages: messages.clone(),
                tools: tools.clone(),
                system: None,
                max_tokens: None,
                task_type: ctx.task_type,
                preferred_provider: None,
                allowed_providers: Some(self.router.provider_names_for_class(current_class)),
            };

            let response = match self.router.chat(request).await {
                Ok(response) => response,
                Err(ProviderError::EmptyResponse) => {
                    empty_streak += 1;
                    if empty_streak >= EMPTY_STREAK_LIMIT {
                        if let Some(next) = current_class.next() {
                            current_class = next;
                            empty_streak = 0;
                            continue;
                        }
                        return self.finalize_with_summary(ctx.project_id, &mut messages, current_class, round, true, tokens_used).await;
                    }
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            empty_streak = 0;
            tokens_used += response.tokens_used;

            if response.tool_calls.is_empty() {
                self.persist_turn(ctx.project_id, ConversationRole::Assistant, &response.text).await?;
                return Ok(ToolLoopOutcome { text: response.text, rounds_used: round + 1, exhausted: false, tokens_used });
            }

            messages.push(assistant_message_with_tools(&response.text, &response.tool_calls));
            self.persist_turn(ctx.project_id, ConversationRole::Assistant, &response.text).await?;

            let round_signature = round_signature(&response.tool_calls);
            if recent_signatures.len() == LOOP_SIGNATURE_LIMIT {
                recent_signatures.pop_front();
            }
            recent_signatures.push_back(round_signature);
            let loop_detected =
                recent_signatures.len() == LOOP_SIGNATURE_LIMIT && recent_signatures.iter().all(|s| s == &recent_signatures[0]);

            for call in &response.tool_calls {
                let result_text = self.dispatch_tool_call(ctx.project_id, ctx.task_id, ctx.plan_scope_approved, call).await?;
                messages.push(Message::tool_result(call.id.clone(), result_text.clone()));
                self.persist_turn(ctx.project_id, ConversationRole::ToolResult, &result_text).await?;
            }

            if loop_detected {
                if let Some(next) = current_class.next() {
                    current_class = next;
                    recent_signatures.clear();
                    continue;
                }
                return self.finalize_with_summary(ctx.project_id, &mut messages, current_class, round, true, tokens_used).await;
            }
        }

        self.finalize_with_summary(ctx.project_id, &mut messages, current_class, MAX_TOOL_ROUNDS, true, tokens_used).await
    }

    async fn dispatch_tool_call(
        &self,
        project_id: ProjectId,
        task_id: &str,
        plan_scope_approved: bool,
        call: &ToolCall,
    ) -> Result<String, ToolLoopError> {
        let decision = self.skills.classify_approval(&call.name, plan_scope_approved);
        let confirmed = match decision {
            ApprovalDecision::RequiresIndividualApproval => {
                if !self.chat.request_approval(project_id, &call.name, &call.input).await {
                    return Ok("denied by user".to_string());
                }
                true
            }
            ApprovalDecision::PlanApproved => true,
            ApprovalDecision::NeedsLocalConfirm => false,
        };

        let key = IdempotencyKey::derive(&call.name, &call.input);
        let response = self.channel.dispatch(task_id, &key, &call.name, call.input.clone(), confirmed).await?;
        Ok(stringify_response(&response))
    }

    async fn load_history(&self, project_id: ProjectId) -> Result<Vec<Message>, ToolLoopError> {
        let turns = self.store.list_conversation_turns(&project_id, ConversationPhase::Coding)?;
        Ok(turns.iter().map(turn_to_message).collect())
    }

    async fn persist_turn(&self, project_id: ProjectId, role: ConversationRole, content: &str) -> Result<(), ToolLoopError> {
        let turn = ConversationTurn::new(project_id, role, content, ConversationPhase::Coding, chrono::Utc::now());
        self.store.insert_conversation_turn(&turn)?;
        Ok(())
    }

    /// Appends a "summarize what you accomplished" instruction and makes
    /// one final, tool-free call, per spec §4.3/§4.4's shared exhaustion
    /// behavior (escalation exhaustion and round exhaustion both resolve
    /// the same way).
    async fn finalize_with_summary(
        &self,
        project_id: ProjectId,
        messages: &mut Vec<Message>,
        current_class: ProviderClass,
        rounds_used: u32,
        exhausted: bool,
        tokens_used: u64,
    ) -> Result<ToolLoopOutcome, ToolLoopError> {
        messages.push(Message::user(
            "You have reached the tool-call limit for this task. Summarize what you accomplished so far and stop.".to_string(),
        ));
        let request = ChatRequest {
            messages: messages.clone(),
            tools: Vec::new(),
            system: None,
            max_tokens: None,
            task_type: TaskType::General,
            preferred_provider: None,
            allowed_providers: Some(self.router.provider_names_for_class(current_class)),
        };
        let response = self.router.chat(request).await?;
        self.persist_turn(project_id, ConversationRole::Assistant, &response.text).await?;
        Ok(ToolLoopOutcome { text: response.text, rounds_used, exhausted, tokens_used: tokens_used + response.tokens_used })
    }
}

fn assistant_message_with_tools(text: &str, tool_calls: &[ToolCall]) -> Message {
    let mut message = Message::assistant(text.to_string());
    message.tool_calls = tool_calls.to_vec();
    message
}

/// A stable per-round signature: each call's `name|canonical(input)`,
/// joined in order. Detects a model re-issuing the same call(s) round
/// after round rather than progressing.
fn round_signature(tool_calls: &[ToolCall]) -> String {
    tool_calls.iter().map(|c| format!("{}|{}", c.name, c.input)).collect::<Vec<_>>().join(";")
}

fn turn_to_message(turn: &ConversationTurn) -> Message {
    match turn.role {
        ConversationRole::System => Message::system(turn.content.clone()),
        ConversationRole::User => Message::user(turn.content.clone()),
        ConversationRole::Assistant => Message::assistant(turn.content.clone()),
        ConversationRole::ToolResult => Message::tool_result("replayed", turn.content.clone()),
    }
}

fn stringify_response(response: &crew_core::ActionResponse) -> String {
    match response {
        crew_core::ActionResponse::Ok { action, result } => {
            serde_json::json!({"action": action, "returncode": result.returncode, "stdout": result.stdout, "stderr": result.stderr}).to_string()
        }
        crew_core::ActionResponse::Error { error } => error.clone(),
    }
}

#[cfg(test)]
#[path = "tool_loop_tests.rs"]
mod tests;
