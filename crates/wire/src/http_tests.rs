// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn action_request_body_defaults_confirmed_to_false() {
    let body: ActionRequestBody = serde_json::from_str(r#"{"action":"git_status","params":{}}"#).unwrap();
    assert!(!body.confirmed);
}

#[test]
fn emergency_stop_response_has_fixed_wire_string() {
    let json = serde_json::to_value(EmergencyStopResponse::default()).unwrap();
    assert_eq!(json["status"], "emergency_stop_sent");
}

#[test]
fn resume_response_has_fixed_wire_string() {
    let json = serde_json::to_value(ResumeResponse::default()).unwrap();
    assert_eq!(json["status"], "resume_sent");
}

#[test]
fn status_response_round_trips() {
    let status = StatusResponse {
        agent_connected: false,
        ssh_fallback_enabled: true,
        ssh_fallback_healthy: true,
        ssh_fallback_target: "user@host:22".to_string(),
    };
    let json = serde_json::to_string(&status).unwrap();
    let back: StatusResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back, status);
}
