use frontdesk::{Config, ProfileStore, SessionController};
use tempfile::TempDir;

fn controller_in(dir: &TempDir) -> SessionController {
    let store = ProfileStore::new(dir.path().join("profile.json"));
    SessionController::new(Config::default(), store)
}

#[tokio::test]
async fn test_stop_without_call_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let controller = controller_in(&dir);

    assert!(!controller.is_active().await);
    controller.stop_call().await.unwrap();
    assert!(controller.stats().await.is_none());
}

#[tokio::test]
async fn test_stop_twice_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let controller = controller_in(&dir);

    controller.stop_call().await.unwrap();
    controller.stop_call().await.unwrap();
    assert!(!controller.is_active().await);
}

#[tokio::test]
async fn test_controller_exposes_profile_store() {
    let dir = TempDir::new().unwrap();
    let controller = controller_in(&dir);

    let profile = controller.profile_store().load().unwrap();
    assert_eq!(profile.agent_name, "Eva");
}

#[tokio::test]
async fn test_subscribe_returns_independent_receivers() {
    let dir = TempDir::new().unwrap();
    let controller = controller_in(&dir);

    let mut a = controller.subscribe();
    let mut b = controller.subscribe();

    // No call running, so both receivers are empty rather than closed.
    assert!(matches!(
        a.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
    assert!(matches!(
        b.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}
