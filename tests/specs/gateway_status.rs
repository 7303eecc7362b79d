//! Gateway status and dispatch-availability specs (spec §6, §4.1).

use crate::prelude::*;

#[test]
fn status_reports_disconnected_when_no_agent_or_fallback_is_configured() {
    let project = Project::git_initialized();
    let gateway = Gateway::start(project.path());

    let status = gateway.status();
    assert_eq!(status["agent_connected"], false);
    assert_eq!(status["ssh_fallback_enabled"], false);
}

#[test]
fn action_without_agent_or_fallback_is_service_unavailable() {
    let project = Project::git_initialized();
    let gateway = Gateway::start(project.path());

    let (http_status, body) = gateway.action("git_status", serde_json::json!({}), false);
    assert_eq!(http_status, 503);
    assert_eq!(body["status"], "error");
}

#[test]
fn action_with_empty_name_is_a_bad_request() {
    let project = Project::git_initialized();
    let gateway = Gateway::start(project.path());

    let (http_status, _body) = gateway.action("", serde_json::json!({}), false);
    assert_eq!(http_status, 400);
}

#[test]
fn emergency_stop_and_resume_are_accepted_even_with_no_agent_connected() {
    let project = Project::git_initialized();
    let gateway = Gateway::start(project.path());

    let stop = gateway.emergency_stop();
    assert_eq!(stop["status"], "emergency_stop_sent");

    let resume = gateway.resume();
    assert_eq!(resume["status"], "resume_sent");
}
