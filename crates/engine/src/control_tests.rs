use super::*;

#[test]
fn emergency_stop_latch_toggles() {
    let control = ControlState::new(30);
    assert!(!control.is_stopped());
    control.stop();
    assert!(control.is_stopped());
    control.resume();
    assert!(!control.is_stopped());
}

#[test]
fn initial_stop_seeds_latch() {
    let control = ControlState::with_initial_stop(30, true);
    assert!(control.is_stopped());
}

#[test]
fn cancel_is_idempotent() {
    let gate = PauseGate::new();
    gate.cancel();
    gate.cancel();
    assert!(gate.is_cancelled());
}

#[tokio::test]
async fn wait_if_paused_returns_immediately_when_not_paused() {
    let gate = PauseGate::new();
    tokio::time::timeout(std::time::Duration::from_millis(100), gate.wait_if_paused()).await.unwrap();
}

#[tokio::test]
async fn wait_if_paused_unblocks_on_resume() {
    let gate = PauseGate::new();
    gate.pause();
    let waiting_gate = gate.clone();
    let waiter = tokio::spawn(async move { waiting_gate.wait_if_paused().await });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    gate.resume();
    tokio::time::timeout(std::time::Duration::from_millis(200), waiter).await.unwrap().unwrap();
}

#[tokio::test]
async fn wait_if_paused_unblocks_on_cancel() {
    let gate = PauseGate::new();
    gate.pause();
    let waiting_gate = gate.clone();
    let waiter = tokio::spawn(async move { waiting_gate.wait_if_paused().await });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    gate.cancel();
    tokio::time::timeout(std::time::Duration::from_millis(200), waiter).await.unwrap().unwrap();
}

#[test]
fn registry_returns_same_gate_for_same_project() {
    let registry = PauseGateRegistry::new();
    let a = registry.gate_for("prj-1");
    a.pause();
    let b = registry.gate_for("prj-1");
    assert!(b.is_paused());
}
