//! End-to-end deck flow: card slots feeding a running coordinator.
//!
//! Set `RUST_LOG=catdeck_core=debug` to see the coordinator's log output.

use std::sync::Arc;
use std::time::Duration;

use catdeck_core::{
    CardSlot, DeckEvent, DeckMessage, DeckSnapshot, DeckState, GestureConfig, GesturePhase,
    MockCatApi, QueueConfig, QueueCoordinator, SwipeDirection,
};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Read messages until a snapshot satisfies `pred`
async fn snapshot_where(
    rx: &mut mpsc::Receiver<DeckMessage>,
    pred: impl Fn(&DeckSnapshot) -> bool,
) -> DeckSnapshot {
    timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Some(DeckMessage::Snapshot(snapshot)) if pred(&snapshot) => return snapshot,
                Some(_) => {}
                None => panic!("coordinator stopped"),
            }
        }
    })
    .await
    .expect("no matching snapshot")
}

fn current_is(id: &'static str) -> impl Fn(&DeckSnapshot) -> bool {
    move |s: &DeckSnapshot| {
        s.state == DeckState::Ready && s.current.as_ref().map(|c| c.id().as_str()) == Some(id)
    }
}

#[tokio::test]
async fn test_swipes_flow_through_running_coordinator() {
    init_tracing();

    let api = Arc::new(MockCatApi::with_candidates(&["a", "b", "c"]));
    let (msg_tx, mut msg_rx) = mpsc::channel(64);
    let (event_tx, event_rx) = mpsc::channel(16);

    let coordinator = QueueCoordinator::new(Arc::clone(&api), QueueConfig::default(), msg_tx);
    let handle = tokio::spawn(coordinator.run(event_rx));

    let mut top = CardSlot::new(GestureConfig::for_viewport(400.0), event_tx.clone());
    event_tx.send(DeckEvent::Load).await.unwrap();

    // Drag past the threshold on the first card
    let snapshot = snapshot_where(&mut msg_rx, current_is("a")).await;
    top.bind(snapshot.current.as_ref());
    assert!(top.begin_drag());
    top.update_drag(60.0, 5.0);
    top.update_drag(180.0, 12.0);
    let commit = top.end_drag().unwrap();
    assert_eq!(commit.direction, SwipeDirection::Right);

    // The fly-off animation runs while the vote is in flight
    while top.tick(16) {}
    assert_eq!(top.state().phase, GesturePhase::Committing(SwipeDirection::Right));

    // Next card arrives; rebinding resets the gesture
    let snapshot = snapshot_where(&mut msg_rx, current_is("b")).await;
    top.bind(snapshot.current.as_ref());
    assert!(top.state().is_resting());

    // Short drag springs back and commits nothing
    assert!(top.begin_drag());
    top.update_drag(-40.0, 0.0);
    assert!(top.end_drag().is_none());
    while top.tick(16) {}
    assert_eq!(top.state().phase, GesturePhase::Idle);

    // Button press commits left
    top.force_commit(SwipeDirection::Left).unwrap();
    snapshot_where(&mut msg_rx, current_is("c")).await;

    let votes = api.votes();
    assert_eq!(votes.len(), 2);
    assert_eq!((votes[0].image_id.as_str(), votes[0].value), ("a", 1));
    assert_eq!((votes[1].image_id.as_str(), votes[1].value), ("b", 0));

    drop(top);
    drop(event_tx);
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("coordinator did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_retry_event_recovers_from_failed_load() {
    init_tracing();

    let api = Arc::new(MockCatApi::with_candidates(&["a"]));
    api.set_fail_breeds(true);

    let (msg_tx, mut msg_rx) = mpsc::channel(64);
    let (event_tx, event_rx) = mpsc::channel(16);
    let coordinator = QueueCoordinator::new(Arc::clone(&api), QueueConfig::default(), msg_tx);
    let handle = tokio::spawn(coordinator.run(event_rx));

    event_tx.send(DeckEvent::Load).await.unwrap();
    let failed = snapshot_where(&mut msg_rx, |s| s.state == DeckState::Error).await;
    assert!(failed.load_error().is_some());

    api.set_fail_breeds(false);
    event_tx.send(DeckEvent::Retry).await.unwrap();
    let ready = snapshot_where(&mut msg_rx, current_is("a")).await;
    assert_eq!(ready.load_error(), None);

    drop(event_tx);
    handle.await.unwrap();
}
