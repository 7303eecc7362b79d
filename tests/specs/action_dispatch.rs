//! Action validation and dispatch specs, exercised against a real paired
//! Gateway + Agent over the Action Dispatch Channel (spec §4.2, §5).

use crate::prelude::*;

#[test]
fn blocked_action_is_rejected_before_any_handler_runs() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);

    let (http_status, body) = gateway.action("shell_exec", serde_json::json!({"command": "echo hi"}), false);
    assert_eq!(http_status, 200);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "blocked");
}

#[test]
fn auto_tier_action_runs_without_confirmation() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);

    let (http_status, body) = gateway.action("git_status", serde_json::json!({}), false);
    assert_eq!(http_status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["result"]["returncode"], 0);
}

#[test]
fn confirm_tier_action_without_confirmed_flag_is_denied() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);
    let target = project.path().join("spec_output.txt");

    let (http_status, body) = gateway.action(
        "file_write",
        serde_json::json!({"path": target.to_string_lossy(), "content": "hello"}),
        false,
    );
    assert_eq!(http_status, 200);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "confirmation_denied");
    assert!(!target.exists(), "file_write must not run before confirmation is granted");
}

#[test]
fn confirm_tier_action_with_confirmed_flag_runs() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);
    let target = project.path().join("spec_output_confirmed.txt");

    let (http_status, body) = gateway.action(
        "file_write",
        serde_json::json!({"path": target.to_string_lossy(), "content": "hello from the spec suite"}),
        true,
    );
    assert_eq!(http_status, 200);
    assert_eq!(body["status"], "ok");
    let written = std::fs::read_to_string(&target).expect("file_write should have created the file");
    assert_eq!(written, "hello from the spec suite");
}

#[test]
fn action_outside_allowed_roots_is_path_denied() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);

    let (http_status, body) = gateway.action(
        "file_write",
        serde_json::json!({"path": "/etc/crewline-spec-escape.txt", "content": "nope"}),
        true,
    );
    assert_eq!(http_status, 200);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "path_denied");
}

#[test]
fn repeated_direct_action_calls_each_dispatch_and_succeed() {
    // Each `/action` call gets its own fresh idempotency scope (see
    // `fresh_task_id` in the control handler), so this exercises
    // repeated real dispatches rather than a cache hit.
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);

    let (status_a, body_a) = gateway.action("git_status", serde_json::json!({}), false);
    let (status_b, body_b) = gateway.action("git_status", serde_json::json!({}), false);
    assert_eq!(status_a, 200);
    assert_eq!(status_b, 200);
    assert_eq!(body_a["status"], "ok");
    assert_eq!(body_b["status"], "ok");
}

#[test]
fn emergency_stop_is_forwarded_and_blocks_subsequent_actions_until_resumed() {
    let project = Project::git_initialized();
    let (gateway, _agent) = paired(&project);

    gateway.emergency_stop();

    let stopped = wait_for(SPEC_WAIT_MAX_MS, || {
        let (_status, body) = gateway.action("git_status", serde_json::json!({"probe": "stop"}), false);
        body["status"] == "error" && body["error"] == "emergency_stop"
    });
    assert!(stopped, "agent should start rejecting actions with emergency_stop once the stop control frame lands");

    gateway.resume();

    let resumed = wait_for(SPEC_WAIT_MAX_MS, || {
        let (_status, body) = gateway.action("git_status", serde_json::json!({"probe": "resume"}), false);
        body["status"] == "ok"
    });
    assert!(resumed, "agent should accept actions again once the resume control frame lands");
}
