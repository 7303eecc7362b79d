// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The LLM Provider Router (spec §4.3): an ordered list of provider
//! adapters, selected by `allowed_providers` filter → preferred provider
//! → task-type class → failure-driven fallthrough, with per-provider
//! daily quota accounting and a pluggable context-window summarizer.
//!
//! Vendor SDKs are an external collaborator (spec §1) — [`HttpProvider`]
//! treats every provider as an opaque chat endpoint reachable over
//! `reqwest`, the same way `crew-adapters`' fallback transport treats
//! the SSH tunnel as an opaque subprocess.

use async_trait::async_trait;
use chrono::Utc;
use crew_core::ConversationTurn;
use crew_storage::Store;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A single turn sent to a provider. Distinct from [`ConversationTurn`]
/// (the persisted record) so provider adapters don't depend on storage
/// column shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    /// Present on an assistant turn that issued tool calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Present on a user turn carrying a tool's output back to the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into(), tool_calls: Vec::new(), tool_call_id: None }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into(), tool_calls: Vec::new(), tool_call_id: None }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into(), tool_calls: Vec::new(), tool_call_id: None }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into(), tool_calls: Vec::new(), tool_call_id: Some(tool_call_id.into()) }
    }
}

/// One `tool_use` block inside an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// A tool schema offered to the model, mirroring `crew-engine::skills::Tool`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Keyword tag the Worker computes per task (spec §4.7), used to bias
/// provider selection toward cheap models for boilerplate and strong
/// models for debugging/refactoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Scaffold,
    Crud,
    UnitTest,
    ReadmePolish,
    HardDebug,
    ComplexRefactor,
    Planning,
    General,
}

/// The coarse capability/cost class a provider belongs to. The Worker's
/// escalation chain (spec §4.3, "Escalation") walks this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderClass {
    Cheap,
    Mid,
    Strong,
    Premium,
}

impl ProviderClass {
    pub const ESCALATION_CHAIN: [ProviderClass; 4] =
        [ProviderClass::Cheap, ProviderClass::Mid, ProviderClass::Strong, ProviderClass::Premium];

    pub fn next(&self) -> Option<ProviderClass> {
        let idx = Self::ESCALATION_CHAIN.iter().position(|c| c == self)?;
        Self::ESCALATION_CHAIN.get(idx + 1).copied()
    }
}

/// Default `task_type` → preferred [`ProviderClass`] mapping (spec §4.7 /
/// SPEC_FULL "task_type mapping table"). Callers may override by passing
/// `preferred_provider`.
pub fn default_class_for_task(task_type: TaskType) -> ProviderClass {
    match task_type {
        TaskType::Scaffold => ProviderClass::Cheap,
        TaskType::Crud => ProviderClass::Mid,
        TaskType::UnitTest => ProviderClass::Cheap,
        TaskType::ReadmePolish => ProviderClass::Cheap,
        TaskType::HardDebug => ProviderClass::Strong,
        TaskType::ComplexRefactor => ProviderClass::Strong,
        TaskType::Planning => ProviderClass::Strong,
        TaskType::General => ProviderClass::Mid,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSchema>,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub task_type: TaskType,
    pub preferred_provider: Option<String>,
    pub allowed_providers: Option<Vec<String>>,
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::General
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub provider_name: String,
    pub model: String,
    pub tokens_used: u64,
}

impl ChatResponse {
    pub fn is_empty_output(&self) -> bool {
        self.text.trim().is_empty() && self.tool_calls.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("quota_exhausted")]
    QuotaExhausted,
    #[error("no_providers_available")]
    NoProvidersAvailable,
    #[error("empty_response")]
    EmptyResponse,
    #[error("provider request failed: {0}")]
    Upstream(String),
    #[error("storage error: {0}")]
    Storage(#[from] crew_storage::StorageError),
}

/// A single upstream LLM endpoint. Implementations never see project or
/// task state — only the already-assembled [`ChatRequest`].
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    fn context_window(&self) -> u32;
    fn class(&self) -> ProviderClass;
    fn daily_request_limit(&self) -> Option<u32>;
    fn is_available(&self) -> bool;
    fn set_available(&self, available: bool);
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Failure classes that exhaust a provider's daily quota outright (spec
/// §4.3 step 4): HTTP 429, and the vendor's own `quota`/`resource_exhausted`
/// error codes.
pub fn is_quota_exhausting_error(status: Option<u16>, body: &str) -> bool {
    status == Some(429) || body.contains("quota") || body.contains("resource_exhausted")
}

/// Treats a vendor endpoint as an opaque JSON chat API: POST `{messages,
/// tools, system, max_tokens}`, expect back `{text, tool_calls, tokens_used}`.
/// No vendor-specific request/response shaping lives here — that belongs
/// to the (out-of-scope) vendor SDK this adapter stands in for.
pub struct HttpProvider {
    name: String,
    model: String,
    context_window: u32,
    class: ProviderClass,
    daily_request_limit: Option<u32>,
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
    available: std::sync::atomic::AtomicBool,
}

impl HttpProvider {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        context_window: u32,
        class: ProviderClass,
        daily_request_limit: Option<u32>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            context_window,
            class,
            daily_request_limit,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            available: std::sync::atomic::AtomicBool::new(true),
        }
    }
}

#[derive(Serialize)]
struct HttpChatBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    tools: &'a [ToolSchema],
    system: &'a Option<String>,
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct HttpChatReply {
    #[serde(default)]
    text: String,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
    #[serde(default)]
    tokens_used: u64,
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn context_window(&self) -> u32 {
        self.context_window
    }

    fn class(&self) -> ProviderClass {
        self.class
    }

    fn daily_request_limit(&self) -> Option<u32> {
        self.daily_request_limit
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, std::sync::atomic::Ordering::SeqCst);
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = HttpChatBody {
            model: &self.model,
            messages: &request.messages,
            tools: &request.tools,
            system: &request.system,
            max_tokens: request.max_tokens,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if is_quota_exhausting_error(Some(status.as_u16()), &text) {
                self.set_available(false);
                return Err(ProviderError::QuotaExhausted);
            }
            return Err(ProviderError::Upstream(format!("{status}: {text}")));
        }

        let reply: HttpChatReply = response.json().await.map_err(|e| ProviderError::Upstream(e.to_string()))?;
        Ok(ChatResponse {
            text: reply.text,
            tool_calls: reply.tool_calls,
            provider_name: self.name.clone(),
            model: self.model.clone(),
            tokens_used: reply.tokens_used,
        })
    }
}

/// Compresses prior conversation history to fit a target context window
/// (spec §4.3, "Context sizing"): pluggable so tests and the default
/// wiring can both swap in a cheap summarization strategy.
#[async_trait]
pub trait Summarizer: Send + Sync + 'static {
    async fn summarize(&self, turns: &[ConversationTurn]) -> String;
}

/// Delegates summarization to the cheapest available provider, per
/// SPEC_FULL's "default implementation delegates to the cheapest
/// available provider".
pub struct ProviderSummarizer {
    router: Arc<ProviderRouter>,
}

impl ProviderSummarizer {
    pub fn new(router: Arc<ProviderRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Summarizer for ProviderSummarizer {
    async fn summarize(&self, turns: &[ConversationTurn]) -> String {
        let transcript: String = turns.iter().map(|t| format!("{}: {}\n", t.role, t.content)).collect();
        let request = ChatRequest {
            messages: vec![Message::user(format!(
                "Summarize the following conversation history in a few sentences, \
                 preserving any decisions and open issues:\n\n{transcript}"
            ))],
            task_type: TaskType::ReadmePolish,
            ..Default::default()
        };
        match self.router.chat(request).await {
            Ok(response) => response.text,
            Err(_) => "(prior conversation summary unavailable)".to_string(),
        }
    }
}

/// Keeps the most recent `keep_recent` turns verbatim and replaces
/// everything older with one synthesized summary turn, so the combined
/// history fits comfortably under `window_tokens`.
pub async fn fit_history_to_window(
    turns: &[ConversationTurn],
    window_tokens: u32,
    keep_recent: usize,
    summarizer: &dyn Summarizer,
) -> Vec<ConversationTurn> {
    let total_tokens: u32 = turns.iter().map(|t| t.token_count).sum();
    // Reserve a quarter of the window for the upcoming request/response.
    let budget = window_tokens.saturating_sub(window_tokens / 4);
    if total_tokens <= budget || turns.len() <= keep_recent {
        return turns.to_vec();
    }

    let split = turns.len() - keep_recent;
    let (older, recent) = turns.split_at(split);
    let summary_text = summarizer.summarize(older).await;
    let project_id = turns[0].project_id;
    let phase = turns[0].phase;
    let summary_turn =
        ConversationTurn::new(project_id, crew_core::ConversationRole::System, format!("[history summary] {summary_text}"), phase, Utc::now());

    let mut result = Vec::with_capacity(recent.len() + 1);
    result.push(summary_turn);
    result.extend_from_slice(recent);
    result
}

/// Serializes quota increments per provider name so concurrent task
/// calls can't lose an update to the same `(provider, date)` row (spec
/// §5, "Provider-quota increments are serialized via a per-provider
/// critical section").
#[derive(Default)]
struct QuotaLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl QuotaLocks {
    fn for_provider(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry(name.to_string()).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
    }
}

/// Holds the ordered provider list and drives selection (spec §4.3).
pub struct ProviderRouter {
    providers: Vec<Arc<dyn Provider>>,
    store: Arc<Store>,
    quota_locks: QuotaLocks,
}

impl ProviderRouter {
    pub fn new(providers: Vec<Arc<dyn Provider>>, store: Arc<Store>) -> Self {
        Self { providers, store, quota_locks: QuotaLocks::default() }
    }

    pub fn provider_named(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    pub fn context_window_for(&self, name: &str) -> Option<u32> {
        self.provider_named(name).map(|p| p.context_window())
    }

    /// Names of every provider at or above `min_class`, in list order.
    /// The Worker's escalation chain uses this to narrow `allowed_providers`
    /// to the current rung (or higher) instead of selecting by name.
    pub fn provider_names_for_class(&self, min_class: ProviderClass) -> Vec<String> {
        self.providers.iter().filter(|p| p.class() >= min_class).map(|p| p.name().to_string()).collect()
    }

    fn candidates<'a>(&'a self, request: &ChatRequest) -> Vec<&'a Arc<dyn Provider>> {
        self.providers
            .iter()
            .filter(|p| match &request.allowed_providers {
                Some(allowed) => allowed.iter().any(|n| n == p.name()),
                None => true,
            })
            .collect()
    }

    async fn within_quota(&self, provider: &Arc<dyn Provider>) -> Result<(), ProviderError> {
        let Some(limit) = provider.daily_request_limit() else { return Ok(()) };
        let today = Utc::now().date_naive();
        let usage = self.store.get_provider_usage(provider.name(), today)?;
        if usage.map(|u| u.is_exhausted(limit)).unwrap_or(false) {
            return Err(ProviderError::QuotaExhausted);
        }
        Ok(())
    }

    async fn record_success(&self, provider: &Arc<dyn Provider>, tokens: u64) -> Result<(), ProviderError> {
        let lock = self.quota_locks.for_provider(provider.name());
        let _guard = lock.lock().await;
        let today = Utc::now().date_naive();
        let mut usage = self
            .store
            .get_provider_usage(provider.name(), today)?
            .unwrap_or_else(|| crew_core::ProviderUsage::new(provider.name(), today));
        usage.record_request(tokens, Utc::now());
        self.store.upsert_provider_usage(&usage)?;
        Ok(())
    }

    async fn record_error(&self, provider: &Arc<dyn Provider>) -> Result<(), ProviderError> {
        let lock = self.quota_locks.for_provider(provider.name());
        let _guard = lock.lock().await;
        let today = Utc::now().date_naive();
        let mut usage = self
            .store
            .get_provider_usage(provider.name(), today)?
            .unwrap_or_else(|| crew_core::ProviderUsage::new(provider.name(), today));
        usage.record_error(Utc::now());
        self.store.upsert_provider_usage(&usage)?;
        Ok(())
    }

    /// Runs the selection algorithm (spec §4.3 "Selection") and returns
    /// the first provider's successful response, falling through to the
    /// next candidate on any failure.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let candidates = self.candidates(&request);
        if candidates.is_empty() {
            return Err(ProviderError::NoProvidersAvailable);
        }

        let mut ordered: Vec<&Arc<dyn Provider>> = Vec::with_capacity(candidates.len());
        if let Some(preferred_name) = &request.preferred_provider {
            if let Some(preferred) = candidates.iter().find(|p| p.name() == preferred_name).copied() {
                ordered.push(preferred);
            }
        }
        let preferred_class = default_class_for_task(request.task_type);
        let mut rest: Vec<&Arc<dyn Provider>> =
            candidates.into_iter().filter(|p| !ordered.iter().any(|o| o.name() == p.name())).collect();
        rest.sort_by_key(|p| if p.class() == preferred_class { 0 } else { 1 });
        ordered.extend(rest);

        let mut last_error = ProviderError::NoProvidersAvailable;
        for provider in ordered {
            if !provider.is_available() {
                continue;
            }
            if self.within_quota(provider).await.is_err() {
                continue;
            }
            match provider.chat(&request).await {
                Ok(response) => {
                    self.record_success(provider, response.tokens_used).await?;
                    if response.is_empty_output() {
                        return Err(ProviderError::EmptyResponse);
                    }
                    return Ok(response);
                }
                Err(ProviderError::QuotaExhausted) => {
                    provider.set_available(false);
                    self.record_error(provider).await?;
                    last_error = ProviderError::QuotaExhausted;
                }
                Err(err) => {
                    self.record_error(provider).await?;
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex as PLMutex;

    /// Scripted provider that returns a fixed sequence of responses (or
    /// errors), cycling the last entry once exhausted. Used to drive the
    /// escalation/empty-output scenarios in spec §8.
    pub struct ScriptedProvider {
        name: String,
        model: String,
        class: ProviderClass,
        context_window: u32,
        daily_request_limit: Option<u32>,
        script: PLMutex<Vec<Result<ChatResponse, String>>>,
        available: std::sync::atomic::AtomicBool,
    }

    impl ScriptedProvider {
        pub fn new(name: &str, class: ProviderClass, script: Vec<Result<ChatResponse, String>>) -> Self {
            Self {
                name: name.to_string(),
                model: format!("{name}-model"),
                class,
                context_window: 8_000,
                daily_request_limit: None,
                script: PLMutex::new(script),
                available: std::sync::atomic::AtomicBool::new(true),
            }
        }

        pub fn with_limit(mut self, limit: u32) -> Self {
            self.daily_request_limit = Some(limit);
            self
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            &self.name
        }
        fn model(&self) -> &str {
            &self.model
        }
        fn context_window(&self) -> u32 {
            self.context_window
        }
        fn class(&self) -> ProviderClass {
            self.class
        }
        fn daily_request_limit(&self) -> Option<u32> {
            self.daily_request_limit
        }
        fn is_available(&self) -> bool {
            self.available.load(std::sync::atomic::Ordering::SeqCst)
        }
        fn set_available(&self, available: bool) {
            self.available.store(available, std::sync::atomic::Ordering::SeqCst);
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            let mut script = self.script.lock();
            let next = if script.len() > 1 { script.remove(0) } else { script[0].clone() };
            next.map_err(ProviderError::Upstream)
        }
    }

    pub fn empty_response(provider_name: &str) -> ChatResponse {
        ChatResponse { text: String::new(), tool_calls: Vec::new(), provider_name: provider_name.into(), model: "test".into(), tokens_used: 0 }
    }

    pub fn text_response(provider_name: &str, text: &str) -> ChatResponse {
        ChatResponse { text: text.into(), tool_calls: Vec::new(), provider_name: provider_name.into(), model: "test".into(), tokens_used: 10 }
    }

    pub fn tool_call_response(provider_name: &str, name: &str, input: serde_json::Value) -> ChatResponse {
        ChatResponse {
            text: String::new(),
            tool_calls: vec![ToolCall { id: format!("call-{name}"), name: name.into(), input }],
            provider_name: provider_name.into(),
            model: "test".into(),
            tokens_used: 10,
        }
    }

    pub struct NoopSummarizer;

    #[async_trait]
    impl Summarizer for NoopSummarizer {
        async fn summarize(&self, turns: &[ConversationTurn]) -> String {
            format!("summarized {} turns", turns.len())
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
