use super::*;
use crew_core::ActionResult;

#[test]
fn send_response_without_connection_does_not_panic() {
    let (client, _rx) = ChannelClient::new();
    client.send_response("req-1", ActionResponse::ok("git_status", ActionResult::default()));
}

#[tokio::test]
async fn ping_frame_is_answered_with_pong_on_outbound() {
    let (client, _rx) = ChannelClient::new();
    let (tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    *client.shared.outbound.lock() = Some(tx);

    let ping = serde_json::to_string(&ServerMessage::Ping).unwrap();
    client.handle_server_text(&ping);

    let sent = outbound_rx.recv().await.unwrap();
    match sent {
        Message::Text(text) => assert!(text.contains("pong")),
        other => panic!("expected text pong frame, got {other:?}"),
    }
}

#[tokio::test]
async fn action_request_frame_is_forwarded_as_event() {
    let (client, mut rx) = ChannelClient::new();
    let frame = ServerMessage::action_request("req-2", "git_status", serde_json::json!({"working_dir": "/tmp"}), false);
    client.handle_server_text(&serde_json::to_string(&frame).unwrap());

    let event = rx.recv().await.unwrap();
    match event {
        ClientEvent::ActionRequest { request_id, action, .. } => {
            assert_eq!(request_id, "req-2");
            assert_eq!(action, "git_status");
        }
        other => panic!("expected ActionRequest event, got {other:?}"),
    }
}

#[tokio::test]
async fn control_frame_is_forwarded_as_event() {
    let (client, mut rx) = ChannelClient::new();
    client.handle_server_text(&serde_json::to_string(&ServerMessage::emergency_stop()).unwrap());
    assert_eq!(rx.recv().await.unwrap(), ClientEvent::Control(ControlKind::EmergencyStop));
}

#[test]
fn garbage_frame_is_ignored_without_panic() {
    let (client, _rx) = ChannelClient::new();
    client.handle_server_text("not json at all");
}
