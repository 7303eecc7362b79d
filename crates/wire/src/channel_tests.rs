// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use crew_core::ActionResult;

#[test]
fn action_request_serializes_with_type_tag() {
    let msg = ServerMessage::action_request("req-1", "git_status", serde_json::json!({}), false);
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["type"], "action_request");
    assert_eq!(json["request_id"], "req-1");
    assert_eq!(json["action"], "git_status");
    assert_eq!(json["confirmed"], false);
}

#[test]
fn control_message_nests_kind() {
    let json = serde_json::to_value(ServerMessage::emergency_stop()).unwrap();
    assert_eq!(json["type"], "control");
    assert_eq!(json["kind"], "emergency_stop");

    let json = serde_json::to_value(ServerMessage::resume()).unwrap();
    assert_eq!(json["kind"], "resume");
}

#[test]
fn ping_serializes_as_bare_type_tag() {
    let json = serde_json::to_value(ServerMessage::Ping).unwrap();
    assert_eq!(json["type"], "ping");
}

#[test]
fn action_response_flattens_status_and_result() {
    let response = ActionResponse::ok("git_status", ActionResult::success("clean", ""));
    let msg = ClientMessage::action_response("req-1", response);
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["type"], "action_response");
    assert_eq!(json["request_id"], "req-1");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["result"]["stdout"], "clean");
}

#[test]
fn pong_round_trips() {
    let json = serde_json::to_string(&ClientMessage::Pong).unwrap();
    let back: ClientMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ClientMessage::Pong);
}

#[test]
fn server_message_round_trips_through_json() {
    let msg = ServerMessage::action_request("req-2", "lint_project", serde_json::json!({"path": "."}), true);
    let json = serde_json::to_string(&msg).unwrap();
    let back: ServerMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn only_confirm_tier_requires_upstream_confirmation() {
    assert!(requires_upstream_confirmation(Tier::Confirm));
    assert!(!requires_upstream_confirmation(Tier::Auto));
    assert!(!requires_upstream_confirmation(Tier::Blocked));
}
