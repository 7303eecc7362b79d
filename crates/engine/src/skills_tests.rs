use super::*;

#[test]
fn default_registry_indexes_every_builtin_tool() {
    let registry = SkillRegistry::default();
    assert!(registry.get_skill_for_tool("git_status").is_some());
    assert!(registry.get_skill_for_tool("docker_build").is_some());
    assert!(registry.get_skill_for_tool("nonexistent_tool").is_none());
}

#[test]
fn plan_auto_approved_membership_matches_git_split() {
    let registry = SkillRegistry::default();
    assert!(registry.is_plan_auto_approved("git_commit"));
    assert!(!registry.is_plan_auto_approved("git_push"));
    assert!(registry.requires_approval("git_push"));
    assert!(!registry.requires_approval("git_commit"));
}

#[test]
fn get_tools_for_role_returns_every_builtin_schema_when_unrestricted() {
    let registry = SkillRegistry::default();
    let tools = registry.get_tools_for_role("backend");
    assert!(tools.iter().any(|t| t.name == "run_tests"));
    assert!(tools.iter().any(|t| t.name == "docker_build"));
}

#[test]
fn classify_approval_prioritizes_requires_approval_over_plan_scope() {
    let registry = SkillRegistry::default();
    assert_eq!(registry.classify_approval("git_push", true), ApprovalDecision::RequiresIndividualApproval);
    assert_eq!(registry.classify_approval("git_commit", false), ApprovalDecision::PlanApproved);
    assert_eq!(registry.classify_approval("docker_build", false), ApprovalDecision::NeedsLocalConfirm);
    assert_eq!(registry.classify_approval("docker_build", true), ApprovalDecision::PlanApproved);
}

#[test]
fn prompt_skill_context_ranks_by_query_overlap_and_respects_role() {
    let registry = SkillRegistry::default();
    registry.register_prompt_skill(PromptSkill::new(
        "rust-idioms",
        "Rust style guide",
        vec!["backend".to_string()],
        "Prefer explicit Result returns over unwrap in production code.",
    ));
    registry.register_prompt_skill(PromptSkill::new("unrelated", "Unrelated", vec!["backend".to_string()], "Completely different topic."));

    let context = registry.get_prompt_skill_context("explicit Result returns", "backend", 5, 500);
    assert_eq!(context.len(), 1);
    assert!(context[0].contains("rust-idioms"));

    let context_wrong_role = registry.get_prompt_skill_context("explicit Result returns", "frontend", 5, 500);
    assert!(context_wrong_role.is_empty());
}

#[test]
fn list_skills_includes_builtins_and_prompt_skills() {
    let registry = SkillRegistry::default();
    registry.register_prompt_skill(PromptSkill::new("extra", "extra skill", vec![], "content"));
    let summaries = registry.list_skills();
    assert!(summaries.iter().any(|s| s.name == "git" && s.kind == "tool"));
    assert!(summaries.iter().any(|s| s.name == "extra" && s.kind == "prompt"));
}
