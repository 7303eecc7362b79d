// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn new_request_is_unconfirmed_by_default() {
    let req = ActionRequest::new("req-1", "git_status", serde_json::json!({}));
    assert!(!req.confirmed);
    let confirmed = req.confirm();
    assert!(confirmed.confirmed);
}

#[test]
fn blocked_error_displays_as_blocked_string() {
    assert_eq!(ActionError::Blocked.to_string(), "blocked");
    assert_eq!(ActionError::EmergencyStop.to_string(), "emergency_stop");
}

#[test]
fn response_error_wraps_error_display_into_wire_string() {
    let response = ActionResponse::from(ActionError::Blocked);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"], "blocked");
}

#[test]
fn response_ok_serializes_nested_result() {
    let response = ActionResponse::ok("git_status", ActionResult::success("", ""));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["action"], "git_status");
    assert_eq!(json["result"]["returncode"], 0);
}

#[test]
fn action_result_is_success_checks_returncode() {
    assert!(ActionResult::success("", "").is_success());
    assert!(!ActionResult { returncode: 1, stdout: String::new(), stderr: String::new() }.is_success());
}

#[test]
fn is_ok_distinguishes_variants() {
    assert!(ActionResponse::ok("x", ActionResult::default()).is_ok());
    assert!(!ActionResponse::error("blocked").is_ok());
}
