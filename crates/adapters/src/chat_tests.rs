use super::fake::FakeChatAdapter;
use super::{ChatAdapter, LoggingChatAdapter};
use crew_core::ProjectId;

#[tokio::test]
async fn logging_adapter_denies_approval_by_default() {
    let adapter = LoggingChatAdapter;
    let approved = adapter.request_approval(ProjectId::new(), "git_push", &serde_json::json!({})).await;
    assert!(!approved);
}

#[tokio::test]
async fn fake_adapter_records_progress_events() {
    let adapter = FakeChatAdapter::new(true);
    let project_id = ProjectId::new();
    adapter.on_progress(project_id, "started", "kicking off").await.unwrap();
    adapter.on_progress(project_id, "task_completed", "init repo done").await.unwrap();

    let events = adapter.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, "started");
    assert!(adapter.request_approval(project_id, "git_push", &serde_json::json!({})).await);
}
