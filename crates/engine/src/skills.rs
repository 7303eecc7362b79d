// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Skill Registry (spec §4.4): the tool schemas offered to an LLM,
//! which skill owns each tool, and the approval classification the tool
//! loop consults before dispatching a call.
//!
//! A [`Skill`] is a named bundle of [`Tool`] schemas plus two subsets of
//! its own tool names: `plan_auto_approved` (forwarded with
//! `confirmed:true` once a project's plan is approved) and
//! `requires_approval` (always asked of the operator individually,
//! regardless of plan approval). Everything else falls through to the
//! Agent's own CONFIRM handling.

use crate::provider::ToolSchema;
use std::collections::HashMap;
use std::sync::Arc;

/// A single callable tool, scoped to exactly one [`Skill`].
#[derive(Debug, Clone)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

impl Tool {
    pub fn new(name: &'static str, description: &'static str, input_schema: serde_json::Value) -> Self {
        Self { name, description, input_schema }
    }

    pub fn to_schema(&self) -> ToolSchema {
        ToolSchema { name: self.name.to_string(), description: self.description.to_string(), input_schema: self.input_schema.clone() }
    }
}

/// A named bundle of tools, gated to a set of agent roles.
pub trait Skill: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn allowed_roles(&self) -> &'static [&'static str];
    fn tools(&self) -> Vec<Tool>;
    /// Tool names forwarded with `confirmed:true` once a project's plan
    /// has been approved, without an individual operator prompt.
    fn plan_auto_approved(&self) -> &'static [&'static str] {
        &[]
    }
    /// Tool names that always require an individual operator approval,
    /// even under an already-approved plan.
    fn requires_approval(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Whether `role` may see this skill's tools at all.
fn role_allowed(allowed: &'static [&'static str], role: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|r| *r == role)
}

macro_rules! builtin_skill {
    ($vis:vis struct $name:ident {
        name: $skill_name:literal,
        description: $skill_desc:literal,
        roles: $roles:expr,
        tools: [$($tool_name:literal => $tool_desc:literal),* $(,)?],
        plan_auto_approved: $auto:expr,
        requires_approval: $confirm:expr $(,)?
    }) => {
        $vis struct $name;

        impl Skill for $name {
            fn name(&self) -> &'static str {
                $skill_name
            }
            fn description(&self) -> &'static str {
                $skill_desc
            }
            fn allowed_roles(&self) -> &'static [&'static str] {
                $roles
            }
            fn tools(&self) -> Vec<Tool> {
                vec![$(Tool::new($tool_name, $tool_desc, simple_object_schema())),*]
            }
            fn plan_auto_approved(&self) -> &'static [&'static str] {
                $auto
            }
            fn requires_approval(&self) -> &'static [&'static str] {
                $confirm
            }
        }
    };
}

/// Every built-in tool takes a flat object of string parameters; the
/// concrete parameter names live in the Agent's own handler contracts
/// (spec §4.2), not in the schema presented to the model.
fn simple_object_schema() -> serde_json::Value {
    serde_json::json!({"type": "object", "additionalProperties": {"type": "string"}})
}

builtin_skill! {
    pub struct FilesystemSkill {
        name: "filesystem",
        description: "Read and write files inside the project workspace.",
        roles: &[],
        tools: ["file_write" => "Write content to a file, creating parent directories as needed."],
        plan_auto_approved: &[],
        requires_approval: &[],
    }
}

builtin_skill! {
    pub struct GitSkill {
        name: "git",
        description: "Inspect and mutate the project's git repository.",
        roles: &[],
        tools: [
            "git_status" => "Show the working tree status.",
            "git_commit" => "Commit staged and tracked changes with a message.",
            "git_push" => "Push a branch to a remote.",
        ],
        plan_auto_approved: &["git_status", "git_commit"],
        requires_approval: &["git_push"],
    }
}

builtin_skill! {
    pub struct BuildSkill {
        name: "build",
        description: "Run tests, lint, and build the project.",
        roles: &[],
        tools: [
            "run_tests" => "Run the project's test suite with a given runner.",
            "lint_project" => "Run a linter over the project.",
            "build_project" => "Build the project with a given build tool.",
            "install_dependencies" => "Install project dependencies with a given package manager.",
            "start_dev_server" => "Start the project's development server.",
        ],
        plan_auto_approved: &["run_tests", "lint_project", "build_project"],
        requires_approval: &[],
    }
}

builtin_skill! {
    pub struct SearchSkill {
        name: "search",
        description: "Search the web for reference material. Executed on the Agent side over the channel, like every other tool.",
        roles: &[],
        tools: ["web_search" => "Search the web for a query and return summarized results."],
        plan_auto_approved: &["web_search"],
        requires_approval: &[],
    }
}

builtin_skill! {
    pub struct IdeSkill {
        name: "ide",
        description: "Archive and package the project workspace.",
        roles: &[],
        tools: ["zip_project" => "Zip the project workspace into an archive, aborting if it would exceed the size cap."],
        plan_auto_approved: &["zip_project"],
        requires_approval: &[],
    }
}

builtin_skill! {
    pub struct DockerSkill {
        name: "docker",
        description: "Build and run the project's container images.",
        roles: &[],
        tools: [
            "docker_build" => "Build a docker image with a given tag.",
            "docker_compose_up" => "Bring up the project's docker-compose stack.",
        ],
        plan_auto_approved: &[],
        requires_approval: &[],
    }
}

builtin_skill! {
    pub struct DelegateSkill {
        name: "delegate",
        description: "Delegate a sub-task to a role-specialized sub-agent or an external coding-agent CLI.",
        roles: &[],
        tools: [
            "delegate_to_agent" => "Hand a described sub-task to a sub-agent of a given role.",
            "run_coding_agent" => "Invoke an external coding-agent CLI (codex/claude/cline) as an opaque executable with a prompt.",
        ],
        plan_auto_approved: &["delegate_to_agent", "run_coding_agent"],
        requires_approval: &[],
    }
}

/// A prompt-only skill: no callable tools, just context text spliced into
/// a system prompt for matching queries (spec `SPEC_FULL` "register_prompt_skill").
/// Carried as a registry-contract feature distinct from the skill-library
/// *contents*, which are out of scope per spec §1.
#[derive(Debug, Clone)]
pub struct PromptSkill {
    pub name: String,
    pub description: String,
    pub allowed_roles: Vec<String>,
    pub content: String,
}

impl PromptSkill {
    pub fn new(name: impl Into<String>, description: impl Into<String>, allowed_roles: Vec<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), allowed_roles, content: content.into() }
    }

    fn matches_role(&self, role: &str) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.iter().any(|r| r == role)
    }

    /// Crude relevance score: number of query words that appear in the
    /// skill's name, description, or content, case-insensitively. Good
    /// enough to rank a handful of loaded prompt skills without pulling
    /// in a real retrieval dependency for an out-of-scope library.
    fn score(&self, query: &str) -> u32 {
        let haystack = format!("{} {} {}", self.name, self.description, self.content).to_lowercase();
        query.to_lowercase().split_whitespace().filter(|word| haystack.contains(word)).count() as u32
    }
}

/// Summary row for introspection/CLI display (`list_skills`), grounded on
/// the teacher's `oj status`/`oj agent` summary commands.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkillSummary {
    pub name: String,
    pub description: String,
    pub tools: Vec<String>,
    pub allowed_roles: Vec<String>,
    pub kind: &'static str,
}

/// The Gateway's registry of built-in tool-bearing skills plus any
/// loaded prompt-only skills.
pub struct SkillRegistry {
    skills: Vec<Arc<dyn Skill>>,
    tool_index: HashMap<&'static str, usize>,
    prompt_skills: parking_lot::RwLock<Vec<PromptSkill>>,
}

impl SkillRegistry {
    pub fn new(skills: Vec<Arc<dyn Skill>>) -> Self {
        let mut tool_index = HashMap::new();
        for (i, skill) in skills.iter().enumerate() {
            for tool in skill.tools() {
                tool_index.insert(tool.name, i);
            }
        }
        Self { skills, tool_index, prompt_skills: parking_lot::RwLock::new(Vec::new()) }
    }

    pub fn get_tools_for_role(&self, role: &str) -> Vec<ToolSchema> {
        self.skills
            .iter()
            .filter(|s| role_allowed(s.allowed_roles(), role))
            .flat_map(|s| s.tools())
            .map(|t| t.to_schema())
            .collect()
    }

    pub fn get_skill_for_tool(&self, tool_name: &str) -> Option<Arc<dyn Skill>> {
        self.tool_index.get(tool_name).map(|&i| self.skills[i].clone())
    }

    pub fn is_plan_auto_approved(&self, tool_name: &str) -> bool {
        self.get_skill_for_tool(tool_name).map(|s| s.plan_auto_approved().contains(&tool_name)).unwrap_or(false)
    }

    pub fn requires_approval(&self, tool_name: &str) -> bool {
        self.get_skill_for_tool(tool_name).map(|s| s.requires_approval().contains(&tool_name)).unwrap_or(false)
    }

    /// Registers a prompt-only skill, loaded from a directory or URL list
    /// of `SKILL.md`-shaped content by the caller.
    pub fn register_prompt_skill(&self, skill: PromptSkill) {
        self.prompt_skills.write().push(skill);
    }

    /// Returns scored, truncated context blocks to splice into a system
    /// prompt, ranked by [`PromptSkill::score`] against `query`.
    pub fn get_prompt_skill_context(&self, query: &str, role: &str, max_skills: usize, max_chars: usize) -> Vec<String> {
        let prompt_skills = self.prompt_skills.read();
        let mut scored: Vec<(u32, &PromptSkill)> =
            prompt_skills.iter().filter(|s| s.matches_role(role)).map(|s| (s.score(query), s)).filter(|(score, _)| *score > 0).collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(max_skills)
            .map(|(_, s)| {
                let mut block = format!("# {}\n{}", s.name, s.content);
                block.truncate(max_chars);
                block
            })
            .collect()
    }

    /// Introspection view over every built-in skill (prompt skills are
    /// listed separately since they carry no callable tools).
    pub fn list_skills(&self) -> Vec<SkillSummary> {
        let mut summaries: Vec<SkillSummary> = self
            .skills
            .iter()
            .map(|s| SkillSummary {
                name: s.name().to_string(),
                description: s.description().to_string(),
                tools: s.tools().into_iter().map(|t| t.name.to_string()).collect(),
                allowed_roles: s.allowed_roles().iter().map(|r| r.to_string()).collect(),
                kind: "tool",
            })
            .collect();
        summaries.extend(self.prompt_skills.read().iter().map(|s| SkillSummary {
            name: s.name.clone(),
            description: s.description.clone(),
            tools: Vec::new(),
            allowed_roles: s.allowed_roles.clone(),
            kind: "prompt",
        }));
        summaries
    }
}

/// Builds the default registry: every built-in skill above, grounded on
/// the prototype's `build_default_registry` skill modules (filesystem,
/// git, build, search, ide, docker, and delegate-to-sub-agent).
impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(FilesystemSkill),
            Arc::new(GitSkill),
            Arc::new(BuildSkill),
            Arc::new(SearchSkill),
            Arc::new(IdeSkill),
            Arc::new(DockerSkill),
            Arc::new(DelegateSkill),
        ])
    }
}

/// The approval decision the tool loop reaches for one call (spec §4.4,
/// "Approval policy per tool call during execution").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Ask the operator individually; deny produces `"denied by user"`.
    RequiresIndividualApproval,
    /// Forward with `confirmed:true` — either plan-auto-approved or the
    /// caller already holds plan-scope approval.
    PlanApproved,
    /// Forward with `confirmed:false`; the Agent's own Validator may
    /// still prompt locally for a CONFIRM-tier action.
    NeedsLocalConfirm,
}

impl SkillRegistry {
    pub fn classify_approval(&self, tool_name: &str, has_plan_scope_approval: bool) -> ApprovalDecision {
        if self.requires_approval(tool_name) {
            ApprovalDecision::RequiresIndividualApproval
        } else if self.is_plan_auto_approved(tool_name) || has_plan_scope_approval {
            ApprovalDecision::PlanApproved
        } else {
            ApprovalDecision::NeedsLocalConfirm
        }
    }
}

#[cfg(test)]
#[path = "skills_tests.rs"]
mod tests;
