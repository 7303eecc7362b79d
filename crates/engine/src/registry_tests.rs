use super::*;

#[test]
fn auto_actions_are_classified_auto() {
    let registry = ActionRegistry::default();
    for name in ["git_status", "run_tests", "lint_project", "start_dev_server", "build_project"] {
        assert_eq!(registry.lookup(name).unwrap().tier, Tier::Auto, "{name}");
    }
}

#[test]
fn confirm_actions_are_classified_confirm() {
    let registry = ActionRegistry::default();
    for name in [
        "git_commit",
        "git_push",
        "install_dependencies",
        "file_write",
        "docker_build",
        "docker_compose_up",
        "zip_project",
        "run_coding_agent",
    ] {
        assert_eq!(registry.lookup(name).unwrap().tier, Tier::Confirm, "{name}");
    }
}

#[test]
fn blocked_actions_are_classified_blocked() {
    let registry = ActionRegistry::default();
    for name in [
        "shell_exec",
        "format_disk",
        "modify_registry",
        "manage_users",
        "firewall_change",
        "download_exec",
        "eval_code",
    ] {
        assert_eq!(registry.lookup(name).unwrap().tier, Tier::Blocked, "{name}");
    }
}

#[test]
fn unknown_action_is_not_registered() {
    let registry = ActionRegistry::default();
    assert!(registry.lookup("delete_everything").is_none());
}

#[test]
fn file_write_declares_its_path_parameter() {
    let registry = ActionRegistry::default();
    assert_eq!(registry.lookup("file_write").unwrap().path_params, &["path"]);
}
